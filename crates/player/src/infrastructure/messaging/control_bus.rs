//! Control bus: the only way background work talks back to the control context.
//!
//! Engine binds and catalog lookups run on spawned tasks. They never touch
//! controller state; they post a [`ControlEvent`] and the owner of the
//! controller applies it on its own turn.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;
use waveline_domain::{AlbumId, ResolvedQueue};

use crate::ports::outbound::{EngineError, PlaybackEngine};

/// Results delivered from background tasks to the control context.
pub enum ControlEvent {
    /// An engine bind finished.
    EngineBound {
        generation: u64,
        result: Result<Arc<dyn PlaybackEngine>, EngineError>,
    },
    /// The engine bound under `generation` died.
    EngineLost { generation: u64 },
    /// A queue resolution finished successfully.
    QueueResolved { request_id: Uuid, queue: ResolvedQueue },
    /// An album-surrogate playlist was resolved to its album.
    AlbumResolved {
        request_id: Uuid,
        target_generation: u64,
        album_id: AlbumId,
    },
}

impl ControlEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ControlEvent::EngineBound { .. } => "engine_bound",
            ControlEvent::EngineLost { .. } => "engine_lost",
            ControlEvent::QueueResolved { .. } => "queue_resolved",
            ControlEvent::AlbumResolved { .. } => "album_resolved",
        }
    }
}

impl fmt::Debug for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEvent::EngineBound { generation, result } => f
                .debug_struct("EngineBound")
                .field("generation", generation)
                .field("ok", &result.is_ok())
                .finish(),
            ControlEvent::EngineLost { generation } => f
                .debug_struct("EngineLost")
                .field("generation", generation)
                .finish(),
            ControlEvent::QueueResolved { request_id, queue } => f
                .debug_struct("QueueResolved")
                .field("request_id", request_id)
                .field("tracks", &queue.len())
                .finish(),
            ControlEvent::AlbumResolved {
                request_id,
                target_generation,
                album_id,
            } => f
                .debug_struct("AlbumResolved")
                .field("request_id", request_id)
                .field("target_generation", target_generation)
                .field("album_id", album_id)
                .finish(),
        }
    }
}

/// Sending half handed to background tasks.
///
/// Cloneable and cheap. Delivery never blocks the background task.
#[derive(Clone)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<ControlEvent>,
}

impl ControlSender {
    /// Post an event to the control context.
    ///
    /// Returns false if the control context is gone; the event is dropped,
    /// which is the intended outcome for work that outlives its owner.
    pub fn deliver(&self, event: ControlEvent) -> bool {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(event = kind, "Control context gone, dropping event");
                false
            }
        }
    }
}

/// Create a connected sender/receiver pair.
pub fn control_channel() -> (ControlSender, mpsc::UnboundedReceiver<ControlEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ControlSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_reaches_receiver() {
        let (sender, mut rx) = control_channel();

        assert!(sender.deliver(ControlEvent::EngineLost { generation: 3 }));

        let received = rx.recv().await.expect("event delivered");
        assert!(matches!(received, ControlEvent::EngineLost { generation: 3 }));
    }

    #[test]
    fn test_deliver_after_receiver_dropped_is_dropped() {
        let (sender, rx) = control_channel();
        drop(rx);

        assert!(!sender.deliver(ControlEvent::EngineLost { generation: 1 }));
    }
}
