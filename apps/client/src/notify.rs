//! One-shot user notifications (the toast layer of a UI).

use std::fmt;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Sending half of the notification channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NotificationKind::Success, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(NotificationKind::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NotificationKind::Error, message.into());
    }

    fn emit(&self, kind: NotificationKind, message: String) {
        match kind {
            NotificationKind::Success => info!("Notify: {message}"),
            NotificationKind::Warning => warn!("Notify: {message}"),
            NotificationKind::Error => error!("Notify: {message}"),
        }

        // A torn-down view has dropped its receiver; the notification is moot.
        if self.tx.send(Notification { kind, message }).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}

/// Drains every notification currently queued without waiting.
pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}
