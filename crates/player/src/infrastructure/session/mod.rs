//! Engine session: binding lifecycle, handles and reconnect policy.

pub mod connection;
pub mod handle;
pub mod retry;

pub use connection::{SessionConnection, TeardownPolicy};
pub use handle::{SessionError, SessionHandle, WeakSessionHandle};
pub use retry::{ReconnectBudget, ReconnectPolicy};
