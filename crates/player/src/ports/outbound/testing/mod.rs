//! Test utilities for outbound ports
//!
//! This module provides fake implementations of the engine port traits for
//! testing. These fakes are available when the `testing` feature is enabled.
//!
//! # Usage
//!
//! Add to your Cargo.toml:
//! ```toml
//! [dev-dependencies]
//! waveline-player = { workspace = true, features = ["testing"] }
//! ```
//!
//! Then import the fakes:
//! ```ignore
//! use waveline_player::ports::outbound::testing::{FakeBinder, FakeEngine};
//! ```

#[cfg(any(test, feature = "testing"))]
mod fake_engine;

#[cfg(any(test, feature = "testing"))]
pub use fake_engine::{FakeBinder, FakeEngine};
