//! Playback Engine Ports - binding to the background engine and its commands
//!
//! The engine lives outside this crate (typically in another process). Binding
//! is asynchronous; once bound, the engine exposes a small synchronous command
//! surface. The crate never holds a `PlaybackEngine` directly outside the
//! session slot, see `infrastructure::session`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use waveline_domain::{ResolvedQueue, TrackMetadata};

/// Errors reported by the engine binding or an engine command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Engine bind failed: {0}")]
    BindFailed(String),
    #[error("Engine connection lost")]
    Lost,
    #[error("Engine command failed: {0}")]
    Command(String),
}

/// Command surface of a bound engine.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PlaybackEngine: Send + Sync {
    /// Replace the engine queue and start playback.
    fn play_queue(&self, queue: ResolvedQueue) -> Result<(), EngineError>;

    /// Set output gain, `0.0..=1.0`.
    fn set_volume(&self, gain: f32) -> Result<(), EngineError>;

    /// Live value of the track currently loaded in the engine.
    fn current_track(&self) -> watch::Receiver<Option<TrackMetadata>>;

    fn is_playing(&self) -> bool;
}

/// Callback the binder invokes when the engine dies underneath a live binding.
///
/// Cloneable so adapters can hand it to whatever watches the engine process.
#[derive(Clone)]
pub struct EngineLossNotifier {
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl EngineLossNotifier {
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// Signal that the engine behind this binding is gone.
    pub fn engine_lost(&self) {
        (self.notify)();
    }
}

impl fmt::Debug for EngineLossNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineLossNotifier").finish_non_exhaustive()
    }
}

/// Identifies one bind request. Unique for the lifetime of a session
/// connection; every successful bind is released with exactly one
/// `unbind` carrying the same id.
pub type BindingId = u64;

/// Port for binding to the background playback engine
#[async_trait]
pub trait EngineBinder: Send + Sync {
    /// Bind to the engine. `on_lost` must be invoked if the engine dies while
    /// this binding is live.
    async fn bind(
        &self,
        binding: BindingId,
        on_lost: EngineLossNotifier,
    ) -> Result<Arc<dyn PlaybackEngine>, EngineError>;

    /// Release one binding. Other bindings stay untouched; unknown ids are
    /// ignored.
    async fn unbind(&self, binding: BindingId);

    /// Fully stop the engine so playback does not outlive the host.
    async fn stop_engine(&self);
}
