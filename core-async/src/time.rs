//! Timers.

pub use tokio::time::{sleep, timeout, Duration, Instant};

/// Error returned by [`timeout`] when the deadline elapses first.
pub use tokio::time::error::Elapsed;
