//! Volume ducking while a voice interaction is in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::voice_search::VoiceEpisode;
use crate::infrastructure::session::{SessionError, WeakSessionHandle};

pub const DEFAULT_DUCK_GAIN: f32 = 0.2;
pub const UNITY_GAIN: f32 = 1.0;

/// Two-state volume toggle applied to whatever session is live.
///
/// Synchronous; never waits for a connection. When no valid handle exists the
/// state still flips but no volume is sent.
#[derive(Clone)]
pub struct VolumeDuckController {
    handle: watch::Receiver<Option<WeakSessionHandle>>,
    ducked: Arc<AtomicBool>,
    duck_gain: f32,
}

impl VolumeDuckController {
    pub fn new(handle: watch::Receiver<Option<WeakSessionHandle>>, duck_gain: f32) -> Self {
        Self {
            handle,
            ducked: Arc::new(AtomicBool::new(false)),
            duck_gain,
        }
    }

    /// Lower the volume to the duck gain. Returns whether a volume was applied.
    pub fn duck(&self) -> bool {
        self.ducked.store(true, Ordering::SeqCst);
        self.apply(self.duck_gain)
    }

    /// Return to unity gain. Returns whether a volume was applied.
    pub fn restore(&self) -> bool {
        self.ducked.store(false, Ordering::SeqCst);
        self.apply(UNITY_GAIN)
    }

    pub fn is_ducked(&self) -> bool {
        self.ducked.load(Ordering::SeqCst)
    }

    pub fn duck_gain(&self) -> f32 {
        self.duck_gain
    }

    /// Bring a newly published session in line with the current state. Only
    /// a ducked state is re-sent; unity is the engine's own default. Returns
    /// whether a volume was applied.
    pub fn sync_to_session(&self) -> bool {
        if !self.is_ducked() {
            return false;
        }
        self.apply(self.duck_gain)
    }

    /// Duck now and restore when the returned episode ends.
    pub fn begin_voice_episode(&self) -> VoiceEpisode {
        VoiceEpisode::start(self.clone())
    }

    fn apply(&self, gain: f32) -> bool {
        let handle = self.handle.borrow().clone();
        let Some(handle) = handle else {
            tracing::debug!(gain, "No session, volume change skipped");
            return false;
        };
        match handle.set_volume(gain) {
            Ok(()) => true,
            Err(SessionError::NotConnected) => {
                tracing::debug!(gain, "Session gone, volume change skipped");
                false
            }
            Err(err) => {
                tracing::warn!(gain, error = %err, "Failed to apply volume");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session::SessionHandle;
    use crate::ports::outbound::testing::FakeEngine;

    fn connected() -> (
        Arc<FakeEngine>,
        SessionHandle,
        watch::Sender<Option<WeakSessionHandle>>,
        VolumeDuckController,
    ) {
        let engine = Arc::new(FakeEngine::new());
        let handle = SessionHandle::new(1, engine.clone());
        let (tx, rx) = watch::channel(Some(handle.downgrade()));
        let duck = VolumeDuckController::new(rx, DEFAULT_DUCK_GAIN);
        (engine, handle, tx, duck)
    }

    #[test]
    fn test_duck_duck_restore_ends_at_unity() {
        let (engine, _handle, _tx, duck) = connected();

        duck.duck();
        duck.duck();
        duck.restore();

        assert_eq!(engine.volumes(), vec![0.2, 0.2, 1.0]);
        assert_eq!(engine.last_volume(), Some(UNITY_GAIN));
        assert!(!duck.is_ducked());
    }

    #[test]
    fn test_without_session_state_flips_but_nothing_is_sent() {
        let (_tx, rx) = watch::channel(None);
        let duck = VolumeDuckController::new(rx, DEFAULT_DUCK_GAIN);

        assert!(!duck.duck());
        assert!(duck.is_ducked());
        assert!(!duck.restore());
    }

    #[test]
    fn test_disposed_handle_is_skipped() {
        let (engine, handle, _tx, duck) = connected();
        handle.dispose();

        assert!(!duck.duck());
        assert!(engine.volumes().is_empty());
    }

    #[test]
    fn test_follows_newly_published_handle() {
        let (first, handle, tx, duck) = connected();
        handle.dispose();

        let second = Arc::new(FakeEngine::new());
        let replacement = SessionHandle::new(2, second.clone());
        tx.send_replace(Some(replacement.downgrade()));

        assert!(duck.duck());
        assert!(first.volumes().is_empty());
        assert_eq!(second.last_volume(), Some(DEFAULT_DUCK_GAIN));
    }

    #[test]
    fn test_sync_reapplies_duck_to_replacement_session() {
        let (first, handle, tx, duck) = connected();
        duck.duck();
        handle.dispose();

        let second = Arc::new(FakeEngine::new());
        let replacement = SessionHandle::new(2, second.clone());
        tx.send_replace(Some(replacement.downgrade()));

        assert!(duck.sync_to_session());
        assert_eq!(first.volumes(), vec![DEFAULT_DUCK_GAIN]);
        assert_eq!(second.volumes(), vec![DEFAULT_DUCK_GAIN]);
    }

    #[test]
    fn test_sync_when_not_ducked_sends_nothing() {
        let (engine, _handle, _tx, duck) = connected();

        assert!(!duck.sync_to_session());
        assert!(engine.volumes().is_empty());
    }
}
