//! User-facing notification channel.
//!
//! User-visible failures and confirmations are reported as (kind, message)
//! pairs; how they are rendered is the embedding UI's concern.

use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Default notifier: routes notices to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => error!("{}", message),
            NoticeKind::Info | NoticeKind::Success => info!("{}", message),
        }
    }
}

/// Notifier that forwards notices over a channel, for a UI (or a test)
/// that wants to observe them.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        let _ = self.tx.send(Notice {
            kind,
            message: message.to_string(),
        });
    }
}
