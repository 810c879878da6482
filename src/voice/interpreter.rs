use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::assist::{AssistantService, CommandKind, VoiceCommand};
use crate::error::Result;
use crate::notify::{NoticeKind, Notifier};
use crate::transcript::{RecognizerEvent, SpeechRecognizer, TranscriptSegment};

use super::wake::WakeWord;

/// Interpreter lifecycle: `Idle → Listening → (per utterance) Dispatching
/// → Listening`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterPhase {
    Idle,
    Listening,
    Dispatching,
}

const PHASE_IDLE: u8 = 0;
const PHASE_LISTENING: u8 = 1;
const PHASE_DISPATCHING: u8 = 2;

/// Single mutator for the interpreter phase.
///
/// `begin_dispatch` is the crate's only mutual-exclusion primitive: the
/// compare-and-swap happens in one synchronous step before any await, so
/// at most one dispatch is in flight per interpreter.
struct PhaseCell(AtomicU8);

impl PhaseCell {
    fn new() -> Self {
        Self(AtomicU8::new(PHASE_IDLE))
    }

    fn get(&self) -> InterpreterPhase {
        match self.0.load(Ordering::SeqCst) {
            PHASE_LISTENING => InterpreterPhase::Listening,
            PHASE_DISPATCHING => InterpreterPhase::Dispatching,
            _ => InterpreterPhase::Idle,
        }
    }

    fn set(&self, phase: InterpreterPhase) {
        let raw = match phase {
            InterpreterPhase::Idle => PHASE_IDLE,
            InterpreterPhase::Listening => PHASE_LISTENING,
            InterpreterPhase::Dispatching => PHASE_DISPATCHING,
        };
        self.0.store(raw, Ordering::SeqCst);
    }

    fn begin_dispatch(&self) -> bool {
        self.0
            .compare_exchange(
                PHASE_LISTENING,
                PHASE_DISPATCHING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    fn finish_dispatch(&self) {
        // Back to Listening unless stop() already forced Idle.
        let _ = self.0.compare_exchange(
            PHASE_DISPATCHING,
            PHASE_LISTENING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

/// Wake-word voice-command interpreter.
///
/// Scans every recognition result for the wake word and dispatches the
/// remainder to the AI gateway, one command at a time: wake-word matches
/// that arrive while a dispatch is in flight are dropped for command
/// purposes (their text still reaches the live-transcript channel).
pub struct VoiceCommandInterpreter {
    recognizer: Mutex<Box<dyn SpeechRecognizer>>,
    service: Arc<AssistantService>,
    wake: WakeWord,
    phase: Arc<PhaseCell>,
    listening: Arc<AtomicBool>,
    command_tx: mpsc::UnboundedSender<VoiceCommand>,
    transcript_tx: mpsc::UnboundedSender<String>,
    transcript: Arc<Mutex<Vec<TranscriptSegment>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    notifier: Arc<dyn Notifier>,
}

impl VoiceCommandInterpreter {
    #[allow(clippy::type_complexity)]
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        service: Arc<AssistantService>,
        wake: WakeWord,
        transcript: Arc<Mutex<Vec<TranscriptSegment>>>,
        notifier: Arc<dyn Notifier>,
    ) -> (
        Self,
        mpsc::UnboundedReceiver<VoiceCommand>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (transcript_tx, transcript_rx) = mpsc::unbounded_channel();
        let interpreter = Self {
            recognizer: Mutex::new(recognizer),
            service,
            wake,
            phase: Arc::new(PhaseCell::new()),
            listening: Arc::new(AtomicBool::new(false)),
            command_tx,
            transcript_tx,
            transcript,
            task: Mutex::new(None),
            notifier,
        };
        (interpreter, command_rx, transcript_rx)
    }

    /// Start the recognizer and begin listening for the wake word.
    pub async fn start(&self) -> Result<()> {
        if self.listening.swap(true, Ordering::SeqCst) {
            warn!("Voice commands already active");
            return Ok(());
        }

        let mut events = match self.recognizer.lock().await.start().await {
            Ok(events) => events,
            Err(e) => {
                self.listening.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        self.phase.set(InterpreterPhase::Listening);
        self.notifier
            .notify(NoticeKind::Success, "Voice commands activated");
        info!("Voice command interpreter listening (wake word: {:?})", self.wake.word());

        let service = Arc::clone(&self.service);
        let wake = self.wake.clone();
        let phase = Arc::clone(&self.phase);
        let listening = Arc::clone(&self.listening);
        let command_tx = self.command_tx.clone();
        let transcript_tx = self.transcript_tx.clone();
        let transcript = Arc::clone(&self.transcript);
        let notifier = Arc::clone(&self.notifier);

        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    RecognizerEvent::Transcript { text, .. } => {
                        // Live display path, regardless of command handling.
                        let _ = transcript_tx.send(text.clone());

                        let scanned = wake.scan(&text);
                        if !scanned.matched || scanned.remainder.is_empty() {
                            continue;
                        }

                        // Single-flight guard: checked and set before any
                        // await. A match while dispatching is dropped.
                        if !phase.begin_dispatch() {
                            debug!("Dispatch in flight, dropping wake-word match");
                            continue;
                        }

                        tokio::spawn(Self::dispatch(
                            Arc::clone(&service),
                            Arc::clone(&transcript),
                            scanned.remainder,
                            command_tx.clone(),
                            Arc::clone(&notifier),
                            Arc::clone(&phase),
                            Arc::clone(&listening),
                        ));
                    }
                    RecognizerEvent::Error(message) => {
                        error!("Voice command recognizer error: {}", message);
                        notifier.notify(NoticeKind::Error, "Voice command error occurred");
                        listening.store(false, Ordering::SeqCst);
                        phase.set(InterpreterPhase::Idle);
                        break;
                    }
                }
            }
        });

        *self.task.lock().await = Some(task);
        Ok(())
    }

    async fn dispatch(
        service: Arc<AssistantService>,
        transcript: Arc<Mutex<Vec<TranscriptSegment>>>,
        command_text: String,
        command_tx: mpsc::UnboundedSender<VoiceCommand>,
        notifier: Arc<dyn Notifier>,
        phase: Arc<PhaseCell>,
        listening: Arc<AtomicBool>,
    ) {
        let outcome = Self::run_command(&service, &transcript, &command_text).await;

        // Stale-response discard: results arriving after stop() are
        // ignored, not cancelled.
        if !listening.load(Ordering::SeqCst) {
            debug!("Interpreter stopped, discarding command result");
        } else {
            match outcome {
                Ok(command) => {
                    info!("Voice command dispatched: {:?}", command.kind);
                    let _ = command_tx.send(command);
                }
                Err(e) => {
                    // Recoverable: the user can repeat the command.
                    error!("Voice command dispatch failed: {}", e);
                    notifier.notify(NoticeKind::Error, "Failed to process command");
                }
            }
        }

        phase.finish_dispatch();
    }

    async fn run_command(
        service: &AssistantService,
        transcript: &Mutex<Vec<TranscriptSegment>>,
        command_text: &str,
    ) -> Result<VoiceCommand> {
        let mut command = service.process_command(command_text).await?;

        match command.kind {
            CommandKind::CreateTask => service.create_task(&command.payload).await?,
            CommandKind::ScheduleFollowup => service.schedule_followup(&command.payload).await?,
            CommandKind::Summarize => {
                let full = {
                    let segments = transcript.lock().await;
                    segments
                        .iter()
                        .map(|s| s.content.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                // The emitted command carries the summary as its payload.
                command.payload = service.generate_summary(&full).await?;
            }
        }

        Ok(command)
    }

    /// Stop the recognizer and leave the listening state.
    pub async fn stop(&self) -> Result<()> {
        self.listening.store(false, Ordering::SeqCst);
        self.phase.set(InterpreterPhase::Idle);
        self.recognizer.lock().await.stop().await?;

        if let Some(task) = self.task.lock().await.take() {
            task.abort();
        }

        self.notifier
            .notify(NoticeKind::Success, "Voice commands deactivated");
        info!("Voice command interpreter stopped");
        Ok(())
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> InterpreterPhase {
        self.phase.get()
    }
}
