//! Application layer: the player controller and the services it composes.

pub mod controller;
pub mod services;

pub use controller::{HostSignal, PlayerController};
