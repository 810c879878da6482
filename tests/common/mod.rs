// Shared fakes for the external collaborator seams: platform media
// devices, peer connection sessions, the speech recognizer, the record
// store, and the AI gateway.

#![allow(dead_code)]

use async_trait::async_trait;
use huddle::{
    AssistantGateway, CaptureConstraints, CompletionKind, Error, IceCandidate, IceConfig,
    MediaKind, MediaStream, MediaTrack, PeerEvent, PeerSession, PeerSessionFactory,
    RecognizerEvent, RecordStore, Result, SdpKind, SessionDescription, SpeechRecognizer,
};
use huddle::{ActionItemRow, MemoryStore, TranscriptRow};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Semaphore};

// ---------------------------------------------------------------------
// Media devices
// ---------------------------------------------------------------------

pub struct FakeDevices {
    pub fail_capture: AtomicBool,
    pub fail_display: AtomicBool,
}

impl FakeDevices {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_capture: AtomicBool::new(false),
            fail_display: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl huddle::MediaDevices for FakeDevices {
    async fn open_capture(&self, constraints: &CaptureConstraints) -> Result<MediaStream> {
        if self.fail_capture.load(Ordering::SeqCst) {
            return Err(Error::DeviceAccess("permission denied".to_string()));
        }
        let mut tracks = vec![MediaTrack::new(MediaKind::Video)];
        if constraints.audio {
            tracks.push(MediaTrack::new(MediaKind::Audio));
        }
        Ok(MediaStream::new(tracks))
    }

    async fn open_display(&self) -> Result<MediaStream> {
        if self.fail_display.load(Ordering::SeqCst) {
            return Err(Error::ScreenShare("display capture denied".to_string()));
        }
        Ok(MediaStream::new(vec![MediaTrack::new(MediaKind::Video)]))
    }
}

pub fn local_stream() -> MediaStream {
    MediaStream::new(vec![
        MediaTrack::new(MediaKind::Audio),
        MediaTrack::new(MediaKind::Video),
    ])
}

// ---------------------------------------------------------------------
// Peer sessions
// ---------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSessionState {
    pub added: StdMutex<Vec<MediaTrack>>,
    pub replaced: StdMutex<Vec<(MediaKind, String)>>,
    pub closed: AtomicBool,
    pub fail_add: AtomicBool,
}

pub struct FakePeerSession {
    state: Arc<FakeSessionState>,
}

#[async_trait]
impl PeerSession for FakePeerSession {
    async fn add_track(&self, track: MediaTrack) -> Result<()> {
        if self.state.fail_add.load(Ordering::SeqCst) {
            return Err(Error::PeerSetup {
                participant_id: String::new(),
                reason: "track attach rejected".to_string(),
            });
        }
        self.state.added.lock().unwrap().push(track);
        Ok(())
    }

    async fn replace_track(&self, kind: MediaKind, track: MediaTrack) -> Result<()> {
        self.state
            .replaced
            .lock()
            .unwrap()
            .push((kind, track.id().to_string()));
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        Ok(SessionDescription {
            kind: SdpKind::Offer,
            sdp: "v=0 fake-offer".to_string(),
        })
    }

    async fn apply_remote_description(&self, _description: SessionDescription) -> Result<()> {
        Ok(())
    }

    async fn add_remote_candidate(&self, _candidate: IceCandidate) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

pub struct FakePeerFactory {
    pub fail_add: AtomicBool,
    sessions: StdMutex<HashMap<String, Arc<FakeSessionState>>>,
    senders: StdMutex<HashMap<String, mpsc::Sender<PeerEvent>>>,
}

impl FakePeerFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_add: AtomicBool::new(false),
            sessions: StdMutex::new(HashMap::new()),
            senders: StdMutex::new(HashMap::new()),
        })
    }

    pub fn session(&self, participant_id: &str) -> Arc<FakeSessionState> {
        self.sessions
            .lock()
            .unwrap()
            .get(participant_id)
            .cloned()
            .expect("no session for participant")
    }

    pub async fn push(&self, participant_id: &str, event: PeerEvent) {
        let sender = self
            .senders
            .lock()
            .unwrap()
            .get(participant_id)
            .cloned()
            .expect("no event sender for participant");
        sender.send(event).await.expect("event channel closed");
    }
}

#[async_trait]
impl PeerSessionFactory for FakePeerFactory {
    async fn connect(
        &self,
        participant_id: &str,
        _ice: &IceConfig,
    ) -> Result<(Box<dyn PeerSession>, mpsc::Receiver<PeerEvent>)> {
        let state = Arc::new(FakeSessionState {
            fail_add: AtomicBool::new(self.fail_add.load(Ordering::SeqCst)),
            ..FakeSessionState::default()
        });
        let (tx, rx) = mpsc::channel(16);

        self.sessions
            .lock()
            .unwrap()
            .insert(participant_id.to_string(), Arc::clone(&state));
        self.senders
            .lock()
            .unwrap()
            .insert(participant_id.to_string(), tx);

        Ok((Box::new(FakePeerSession { state }), rx))
    }
}

// ---------------------------------------------------------------------
// Speech recognizer
// ---------------------------------------------------------------------

type SenderSlot = Arc<StdMutex<Option<mpsc::Sender<RecognizerEvent>>>>;

/// Recognizer whose results are produced by the test through a handle.
pub struct ScriptedRecognizer {
    slot: SenderSlot,
    active: Arc<AtomicBool>,
}

pub struct RecognizerHandle {
    slot: SenderSlot,
}

impl ScriptedRecognizer {
    pub fn new() -> (Self, RecognizerHandle) {
        let slot: SenderSlot = Arc::new(StdMutex::new(None));
        (
            Self {
                slot: Arc::clone(&slot),
                active: Arc::new(AtomicBool::new(false)),
            },
            RecognizerHandle { slot },
        )
    }
}

impl RecognizerHandle {
    fn sender(&self) -> mpsc::Sender<RecognizerEvent> {
        self.slot
            .lock()
            .unwrap()
            .clone()
            .expect("recognizer not started")
    }

    pub async fn say(&self, text: &str, is_final: bool) {
        self.sender()
            .send(RecognizerEvent::Transcript {
                text: text.to_string(),
                is_final,
            })
            .await
            .expect("recognizer channel closed");
    }

    pub async fn fail(&self, message: &str) {
        self.sender()
            .send(RecognizerEvent::Error(message.to_string()))
            .await
            .expect("recognizer channel closed");
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognizerEvent>> {
        let (tx, rx) = mpsc::channel(64);
        *self.slot.lock().unwrap() = Some(tx);
        self.active.store(true, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        *self.slot.lock().unwrap() = None;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------

/// Store that can be switched into a failing mode.
pub struct FailingStore {
    pub fail: AtomicBool,
    pub inner: MemoryStore,
}

impl FailingStore {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(fail),
            inner: MemoryStore::new(),
        })
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert_transcript(&self, row: TranscriptRow) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Persistence("store rejected write".to_string()));
        }
        self.inner.insert_transcript(row).await
    }

    async fn insert_action_item(&self, row: ActionItemRow) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Persistence("store rejected write".to_string()));
        }
        self.inner.insert_action_item(row).await
    }
}

/// Store whose inserts block until the test grants a permit.
pub struct GatedStore {
    pub inner: MemoryStore,
    pub gate: Semaphore,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            gate: Semaphore::new(0),
        })
    }

    async fn wait(&self) -> Result<()> {
        let permit = self.gate.acquire().await.map_err(|_| {
            Error::Persistence("gate closed".to_string())
        })?;
        permit.forget();
        Ok(())
    }
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn insert_transcript(&self, row: TranscriptRow) -> Result<()> {
        self.wait().await?;
        self.inner.insert_transcript(row).await
    }

    async fn insert_action_item(&self, row: ActionItemRow) -> Result<()> {
        self.wait().await?;
        self.inner.insert_action_item(row).await
    }
}

// ---------------------------------------------------------------------
// AI gateway
// ---------------------------------------------------------------------

/// Gateway with canned responses per completion kind.
pub struct StaticGateway {
    responses: StdMutex<HashMap<CompletionKind, String>>,
    pub calls: StdMutex<Vec<(CompletionKind, String)>>,
}

impl StaticGateway {
    pub fn new(responses: &[(CompletionKind, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: StdMutex::new(
                responses
                    .iter()
                    .map(|(k, v)| (*k, v.to_string()))
                    .collect(),
            ),
            calls: StdMutex::new(Vec::new()),
        })
    }

    pub fn set_response(&self, kind: CompletionKind, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(kind, response.to_string());
    }

    pub fn calls_of(&self, kind: CompletionKind) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

#[async_trait]
impl AssistantGateway for StaticGateway {
    async fn complete(&self, kind: CompletionKind, content: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((kind, content.to_string()));
        let responses = self.responses.lock().unwrap();
        responses.get(&kind).cloned().ok_or_else(|| Error::Gateway {
            attempts: 1,
            reason: format!("no canned response for {:?}", kind),
        })
    }
}

/// Gateway that blocks each `complete` call until the test grants a permit.
pub struct GatedGateway {
    inner: Arc<StaticGateway>,
    pub gate: Semaphore,
    pub calls: AtomicU32,
}

impl GatedGateway {
    pub fn new(responses: &[(CompletionKind, &str)]) -> Arc<Self> {
        Arc::new(Self {
            inner: StaticGateway::new(responses),
            gate: Semaphore::new(0),
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls_of(&self, kind: CompletionKind) -> usize {
        self.inner.calls_of(kind)
    }
}

#[async_trait]
impl AssistantGateway for GatedGateway {
    async fn complete(&self, kind: CompletionKind, content: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Error::Gateway {
                attempts: 1,
                reason: "gate closed".to_string(),
            })?;
        permit.forget();
        self.inner.complete(kind, content).await
    }
}

/// Gateway that always reports terminal failure.
pub struct FailingGateway {
    pub calls: AtomicU32,
}

impl FailingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl AssistantGateway for FailingGateway {
    async fn complete(&self, _kind: CompletionKind, _content: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Gateway {
            attempts: 3,
            reason: "assistant unavailable".to_string(),
        })
    }
}
