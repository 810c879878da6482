use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::media::{MediaDevices, MediaStream};
use crate::notify::{NoticeKind, Notifier};

use super::session::{IceConfig, PeerEvent, PeerSession, PeerSessionFactory, PeerState};
use super::signaling::{IceCandidate, SessionDescription};

/// Full snapshot of participant → remote stream, emitted on every change.
pub type StreamMap = HashMap<String, MediaStream>;

/// One entry per remote participant
struct PeerRecord {
    session: Box<dyn PeerSession>,
    remote_stream: Option<MediaStream>,
    state: PeerState,
    event_task: Option<JoinHandle<()>>,
}

/// Manages one connection session per remote participant.
///
/// Remote-track arrivals always re-emit the entire participant→stream map,
/// never a delta, so the observer holds a consistent snapshot even when
/// several tracks arrive close together. A connection that reports
/// `Failed` is removed on the spot; reconnecting is the caller's decision.
pub struct PeerOrchestrator {
    factory: Arc<dyn PeerSessionFactory>,
    devices: Arc<dyn MediaDevices>,
    ice: IceConfig,
    peers: Arc<Mutex<HashMap<String, PeerRecord>>>,
    local_stream: Mutex<Option<MediaStream>>,
    display_stream: Mutex<Option<MediaStream>>,
    stream_tx: mpsc::UnboundedSender<StreamMap>,
    notifier: Arc<dyn Notifier>,
}

impl PeerOrchestrator {
    pub fn new(
        factory: Arc<dyn PeerSessionFactory>,
        devices: Arc<dyn MediaDevices>,
        ice: IceConfig,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, mpsc::UnboundedReceiver<StreamMap>) {
        let (stream_tx, stream_rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            factory,
            devices,
            ice,
            peers: Arc::new(Mutex::new(HashMap::new())),
            local_stream: Mutex::new(None),
            display_stream: Mutex::new(None),
            stream_tx,
            notifier,
        };
        (orchestrator, stream_rx)
    }

    /// Hand the orchestrator the local stream to send to peers.
    ///
    /// When peers already exist (device switch), every live connection's
    /// outbound tracks are rebuilt from the new stream so no stale track
    /// reference survives.
    pub async fn set_local_stream(&self, stream: MediaStream) -> Result<()> {
        let previous = {
            let mut local = self.local_stream.lock().await;
            local.replace(stream.clone())
        };

        if previous.is_some() {
            let peers = self.peers.lock().await;
            for (id, record) in peers.iter() {
                for track in stream.tracks() {
                    if let Err(e) = record.session.replace_track(track.kind(), track.clone()).await
                    {
                        warn!("Failed to swap {:?} track for peer {}: {}", track.kind(), id, e);
                    }
                }
            }
        }

        Ok(())
    }

    /// Create a connection session for a new remote participant.
    ///
    /// Attaches all current local tracks and starts consuming the session's
    /// events. A second call for the same id is a logged no-op.
    pub async fn add_peer(&self, participant_id: &str) -> Result<()> {
        {
            let peers = self.peers.lock().await;
            if peers.contains_key(participant_id) {
                warn!("Peer {} already exists, skipping", participant_id);
                return Ok(());
            }
        }

        info!("Creating peer connection for {}", participant_id);

        let (session, events) = self
            .factory
            .connect(participant_id, &self.ice)
            .await
            .map_err(|e| Error::PeerSetup {
                participant_id: participant_id.to_string(),
                reason: e.to_string(),
            })?;

        let local = self.local_stream.lock().await.clone();
        if let Some(local) = local {
            for track in local.tracks() {
                if let Err(e) = session.add_track(track.clone()).await {
                    session.close().await;
                    return Err(Error::PeerSetup {
                        participant_id: participant_id.to_string(),
                        reason: format!("failed to attach local {:?} track: {}", track.kind(), e),
                    });
                }
            }
        }

        // Insert the record before consuming events so a track arriving
        // immediately still finds its entry in the map.
        {
            let mut peers = self.peers.lock().await;
            peers.insert(
                participant_id.to_string(),
                PeerRecord {
                    session,
                    remote_stream: None,
                    state: PeerState::New,
                    event_task: None,
                },
            );
        }

        let task = self.spawn_event_task(participant_id.to_string(), events);

        let mut peers = self.peers.lock().await;
        match peers.get_mut(participant_id) {
            Some(record) => record.event_task = Some(task),
            // Removed before we got here (instant failure); don't leak the task.
            None => task.abort(),
        }

        Ok(())
    }

    fn spawn_event_task(
        &self,
        participant_id: String,
        mut events: mpsc::Receiver<PeerEvent>,
    ) -> JoinHandle<()> {
        let peers = Arc::clone(&self.peers);
        let stream_tx = self.stream_tx.clone();
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    PeerEvent::RemoteTrack(stream) => {
                        let snapshot = {
                            let mut map = peers.lock().await;
                            match map.get_mut(&participant_id) {
                                Some(record) => record.remote_stream = Some(stream),
                                None => continue,
                            }
                            Self::snapshot(&map)
                        };
                        let _ = stream_tx.send(snapshot);
                    }
                    PeerEvent::StateChange(state) => {
                        info!("Connection state for {}: {:?}", participant_id, state);
                        match state {
                            PeerState::Failed => {
                                notifier.notify(
                                    NoticeKind::Error,
                                    &format!(
                                        "Connection failed with participant {}",
                                        participant_id
                                    ),
                                );
                                // Fail fast: drop the peer, never retry here.
                                // The returned handle is this task's own;
                                // aborting it would cancel the snapshot send.
                                // The loop ends at the break below instead.
                                let _ = Self::drop_peer(&peers, &participant_id).await;
                                let snapshot = Self::snapshot(&*peers.lock().await);
                                let _ = stream_tx.send(snapshot);
                                break;
                            }
                            PeerState::Closed => break,
                            other => {
                                let mut map = peers.lock().await;
                                if let Some(record) = map.get_mut(&participant_id) {
                                    record.state = other;
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    fn snapshot(map: &HashMap<String, PeerRecord>) -> StreamMap {
        map.iter()
            .filter_map(|(id, record)| {
                record.remote_stream.clone().map(|s| (id.clone(), s))
            })
            .collect()
    }

    /// Close one peer's session and forget its record.
    async fn drop_peer(
        peers: &Mutex<HashMap<String, PeerRecord>>,
        participant_id: &str,
    ) -> Option<JoinHandle<()>> {
        let record = peers.lock().await.remove(participant_id)?;
        record.session.close().await;
        info!("Removed peer {}", participant_id);
        record.event_task
    }

    pub async fn remove_peer(&self, participant_id: &str) {
        if let Some(task) = Self::drop_peer(&self.peers, participant_id).await {
            task.abort();
        }
        let snapshot = Self::snapshot(&*self.peers.lock().await);
        let _ = self.stream_tx.send(snapshot);
    }

    /// Create an offer for the given peer, to be relayed over signaling.
    pub async fn create_offer(&self, participant_id: &str) -> Result<SessionDescription> {
        let peers = self.peers.lock().await;
        let record = peers.get(participant_id).ok_or_else(|| Error::PeerSetup {
            participant_id: participant_id.to_string(),
            reason: "unknown peer".to_string(),
        })?;
        record.session.create_offer().await
    }

    /// Apply an answer that arrived over signaling.
    pub async fn apply_answer(
        &self,
        participant_id: &str,
        description: SessionDescription,
    ) -> Result<()> {
        let peers = self.peers.lock().await;
        match peers.get(participant_id) {
            Some(record) => record.session.apply_remote_description(description).await,
            None => {
                warn!("Answer for unknown peer {}, ignoring", participant_id);
                Ok(())
            }
        }
    }

    /// Apply an ICE candidate that arrived over signaling.
    pub async fn apply_candidate(
        &self,
        participant_id: &str,
        candidate: IceCandidate,
    ) -> Result<()> {
        let peers = self.peers.lock().await;
        match peers.get(participant_id) {
            Some(record) => record.session.add_remote_candidate(candidate).await,
            None => {
                warn!("Candidate for unknown peer {}, ignoring", participant_id);
                Ok(())
            }
        }
    }

    /// Acquire a display-capture stream and substitute its tracks into
    /// every existing connection, kind for kind, without renegotiating.
    pub async fn start_screen_share(&self) -> Result<MediaStream> {
        let display_capture = self
            .devices
            .open_display()
            .await
            .map_err(|e| Error::ScreenShare(e.to_string()))?;

        info!("Display capture acquired: {}", display_capture.id());

        {
            let peers = self.peers.lock().await;
            for (id, record) in peers.iter() {
                for track in display_capture.tracks() {
                    if let Err(e) =
                        record.session.replace_track(track.kind(), track.clone()).await
                    {
                        warn!(
                            "Failed to substitute {:?} track for peer {}: {}",
                            track.kind(),
                            id,
                            e
                        );
                    }
                }
            }
        }

        let mut slot = self.display_stream.lock().await;
        if let Some(previous) = slot.take() {
            previous.stop_all();
        }
        *slot = Some(display_capture.clone());

        Ok(display_capture)
    }

    pub async fn participants(&self) -> Vec<String> {
        self.peers.lock().await.keys().cloned().collect()
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }

    pub async fn peer_state(&self, participant_id: &str) -> Option<PeerState> {
        self.peers
            .lock()
            .await
            .get(participant_id)
            .map(|record| record.state)
    }

    /// Close every connection and release the streams this orchestrator
    /// was given ownership of. Idempotent.
    pub async fn cleanup(&self) {
        let records: Vec<(String, PeerRecord)> =
            self.peers.lock().await.drain().collect();

        for (id, record) in records {
            record.session.close().await;
            if let Some(task) = record.event_task {
                task.abort();
            }
            info!("Closed connection to {}", id);
        }

        if let Some(display) = self.display_stream.lock().await.take() {
            display.stop_all();
        }
        if let Some(local) = self.local_stream.lock().await.take() {
            local.stop_all();
        }
    }
}

impl Drop for PeerOrchestrator {
    fn drop(&mut self) {
        // Event tasks hold only weak-side resources (the peers map Arc and
        // channel senders); anything still running is aborted here.
        if let Ok(mut peers) = self.peers.try_lock() {
            for record in peers.values_mut() {
                if let Some(task) = record.event_task.take() {
                    task.abort();
                }
            }
        }
    }
}
