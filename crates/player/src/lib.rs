//! Waveline Player core.
//!
//! Supervises the connection to the background playback engine and turns
//! external references (links, shares, shortcuts) into navigation or engine
//! queues. The host owns a single [`PlayerController`] and drives it with
//! lifecycle signals; engine, catalog, navigation and preferences are reached
//! only through the ports in [`ports::outbound`].

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;

pub use application::{HostSignal, PlayerController};
pub use config::{ConfigError, PlayerConfig};
