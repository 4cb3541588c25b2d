//! Messaging between the control context and background work.
//!
//! - `ControlSender` / `ControlEvent`: results posted back from spawned tasks
//! - `SessionState` / `SessionStateObserver`: observable session lifecycle

pub mod connection;
pub mod control_bus;

pub use connection::{set_session_state, SessionState, SessionStateObserver};
pub use control_bus::{control_channel, ControlEvent, ControlSender};
