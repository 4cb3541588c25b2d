pub mod messaging;
pub mod session;

// Re-export messaging types
pub use messaging::{ControlEvent, ControlSender, SessionState, SessionStateObserver};
pub use session::{SessionConnection, SessionError, WeakSessionHandle};
