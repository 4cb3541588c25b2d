//! Session handles: the only path from this crate to a bound engine.
//!
//! `SessionHandle` is owned by the session connection and never cloned.
//! Everyone else gets a `WeakSessionHandle`, through which every command is
//! fallible: the engine slot may be emptied at any moment by a disconnect.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use thiserror::Error;
use tokio::sync::watch;
use waveline_domain::{ResolvedQueue, TrackMetadata};

use crate::ports::outbound::{EngineError, PlaybackEngine};

/// Errors from commands issued through a session handle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The handle was invalidated; the command never reached an engine.
    #[error("Not connected to the playback engine")]
    NotConnected,
    #[error("Volume must be within 0.0..=1.0, got {0}")]
    InvalidVolume(f32),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

struct HandleSlot {
    generation: u64,
    engine: RwLock<Option<Arc<dyn PlaybackEngine>>>,
}

/// Owning handle to a live engine binding.
pub struct SessionHandle {
    slot: Arc<HandleSlot>,
}

impl SessionHandle {
    pub(crate) fn new(generation: u64, engine: Arc<dyn PlaybackEngine>) -> Self {
        Self {
            slot: Arc::new(HandleSlot {
                generation,
                engine: RwLock::new(Some(engine)),
            }),
        }
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation
    }

    pub fn downgrade(&self) -> WeakSessionHandle {
        WeakSessionHandle {
            slot: Arc::downgrade(&self.slot),
            generation: self.slot.generation,
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.downgrade().is_playing()
    }

    /// Empty the engine slot.
    ///
    /// Takes the write lock, so this waits for commands already executing and
    /// every command issued afterwards sees `NotConnected`.
    pub(crate) fn dispose(self) {
        let mut engine = self
            .slot
            .engine
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        engine.take();
    }
}

/// Capability to query and command the engine while the session lasts.
#[derive(Clone)]
pub struct WeakSessionHandle {
    slot: Weak<HandleSlot>,
    generation: u64,
}

impl std::fmt::Debug for WeakSessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSessionHandle")
            .field("generation", &self.generation)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl WeakSessionHandle {
    /// Bind generation this handle was created for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the handle still reaches an engine. Only a snapshot: the next
    /// command may still report `NotConnected`.
    pub fn is_valid(&self) -> bool {
        self.with_engine(|_| Ok(())).is_ok()
    }

    pub fn play_queue(&self, queue: ResolvedQueue) -> Result<(), SessionError> {
        self.with_engine(move |engine| engine.play_queue(queue))
    }

    pub fn set_volume(&self, gain: f32) -> Result<(), SessionError> {
        if !(0.0..=1.0).contains(&gain) {
            return Err(SessionError::InvalidVolume(gain));
        }
        self.with_engine(|engine| engine.set_volume(gain))
    }

    pub fn observe_current_track(
        &self,
    ) -> Result<watch::Receiver<Option<TrackMetadata>>, SessionError> {
        self.with_engine(|engine| Ok(engine.current_track()))
    }

    /// Whether the engine is playing; `false` once the handle is invalid.
    pub fn is_playing(&self) -> bool {
        self.with_engine(|engine| Ok(engine.is_playing()))
            .unwrap_or(false)
    }

    /// Run `command` against the engine while holding the slot's read lock.
    fn with_engine<R>(
        &self,
        command: impl FnOnce(&dyn PlaybackEngine) -> Result<R, EngineError>,
    ) -> Result<R, SessionError> {
        let slot = self.slot.upgrade().ok_or(SessionError::NotConnected)?;
        let guard = slot.engine.read().unwrap_or_else(PoisonError::into_inner);
        let engine = guard.as_ref().ok_or(SessionError::NotConnected)?;
        command(engine.as_ref()).map_err(SessionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::testing::FakeEngine;
    use crate::ports::outbound::MockPlaybackEngine;
    use waveline_domain::{VideoId, WatchEndpoint};

    fn queue() -> ResolvedQueue {
        let track = TrackMetadata::new(VideoId::new("V1").expect("valid id"), "One");
        ResolvedQueue::from_catalog(WatchEndpoint::default(), vec![track])
    }

    #[test]
    fn test_commands_reach_engine_while_live() {
        let engine = Arc::new(FakeEngine::new());
        let handle = SessionHandle::new(1, engine.clone());
        let weak = handle.downgrade();

        weak.play_queue(queue()).expect("connected");
        weak.set_volume(0.5).expect("connected");

        assert!(weak.is_valid());
        assert_eq!(engine.played_queues().len(), 1);
        assert_eq!(engine.last_volume(), Some(0.5));
        assert!(weak.is_playing());
    }

    #[test]
    fn test_commands_after_dispose_report_not_connected() {
        let engine = Arc::new(FakeEngine::new());
        let handle = SessionHandle::new(1, engine.clone());
        let weak = handle.downgrade();

        handle.dispose();

        assert_eq!(weak.play_queue(queue()), Err(SessionError::NotConnected));
        assert_eq!(weak.set_volume(1.0), Err(SessionError::NotConnected));
        assert!(weak.observe_current_track().is_err());
        assert!(!weak.is_valid());
        assert!(!weak.is_playing());
        assert!(engine.played_queues().is_empty());
    }

    #[test]
    fn test_volume_outside_unit_range_is_rejected() {
        let engine = Arc::new(FakeEngine::new());
        let handle = SessionHandle::new(1, engine.clone());
        let weak = handle.downgrade();

        assert_eq!(weak.set_volume(1.5), Err(SessionError::InvalidVolume(1.5)));
        assert!(matches!(
            weak.set_volume(f32::NAN),
            Err(SessionError::InvalidVolume(_))
        ));
        assert!(engine.volumes().is_empty());
    }

    #[test]
    fn test_engine_errors_are_surfaced() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_set_volume()
            .returning(|_| Err(EngineError::Command("mixer unavailable".into())));
        let handle = SessionHandle::new(7, Arc::new(engine));

        let result = handle.downgrade().set_volume(0.2);

        assert_eq!(
            result,
            Err(SessionError::Engine(EngineError::Command(
                "mixer unavailable".into()
            )))
        );
        assert_eq!(handle.generation(), 7);
    }

    #[test]
    fn test_current_track_follows_engine() {
        let engine = Arc::new(FakeEngine::new());
        let handle = SessionHandle::new(1, engine.clone());
        let weak = handle.downgrade();

        let rx = weak.observe_current_track().expect("connected");
        assert!(rx.borrow().is_none());

        weak.play_queue(queue()).expect("connected");
        assert_eq!(
            rx.borrow().as_ref().map(|track| track.id.as_str().to_string()),
            Some("V1".to_string())
        );
    }
}
