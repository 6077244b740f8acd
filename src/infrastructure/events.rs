//! Event Sink
//!
//! Carries [`SyncEvent`]s from the blocking sync thread to whoever renders
//! progress. Sending never blocks and a dropped receiver is ignored.

use crate::domain::models::SyncEvent;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl EventSink {
    pub fn new(sender: mpsc::UnboundedSender<SyncEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A sink that drops everything
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: SyncEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
