//! Session lifecycle state.
//!
//! This module provides the session state enum and a cheap observer the
//! presentation layer can poll without touching the connection itself.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle state of the connection to the playback engine.
///
/// ```text
/// Idle -> Connecting -> Connected -> (Disconnected | Lost) -> [Connecting on retry]
///                                                         -> Idle (teardown)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never connected, or torn down for good
    Idle,
    /// Bind requested, waiting for the engine
    Connecting,
    /// A live session handle exists
    Connected,
    /// Released by the host, or a reconnect attempt failed
    Disconnected,
    /// The engine died underneath a live handle
    Lost,
}

impl SessionState {
    /// Convert to u8 for atomic storage.
    pub fn to_u8(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Connecting => 1,
            SessionState::Connected => 2,
            SessionState::Disconnected => 3,
            SessionState::Lost => 4,
        }
    }

    /// Convert from u8 (atomic storage).
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => SessionState::Connecting,
            2 => SessionState::Connected,
            3 => SessionState::Disconnected,
            4 => SessionState::Lost,
            _ => SessionState::Idle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Connected => "connected",
            SessionState::Disconnected => "disconnected",
            SessionState::Lost => "lost",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable session state for UI binding.
///
/// Multiple observers share the same underlying state; only the session
/// connection writes it.
#[derive(Clone)]
pub struct SessionStateObserver {
    state: Arc<AtomicU8>,
}

impl SessionStateObserver {
    /// Create a new observer from a shared state Arc.
    pub fn new(state: Arc<AtomicU8>) -> Self {
        Self { state }
    }

    /// Get the current session state.
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }
}

/// Internal helper to update session state (used by the session connection).
pub fn set_session_state(state_ref: &AtomicU8, new_state: SessionState) {
    state_ref.store(new_state.to_u8(), Ordering::SeqCst);
}
