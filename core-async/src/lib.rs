//! Async runtime facade for the media catalog workspace.
//!
//! All `core-*` crates depend on this crate instead of naming Tokio directly.
//! It re-exports the executor entry points, task spawning, timers and the
//! synchronization primitives the catalog needs, plus one primitive of its
//! own: [`sync::CompletionSignal`], a value that is published exactly once and
//! observed by any number of waiters.
//!
//! # Modules
//!
//! - `task`: Task spawning (`spawn`, `spawn_blocking`)
//! - `time`: Timers (`sleep`, `timeout`, `Duration`, `Instant`)
//! - `sync`: Locks, channels and the broadcast-once `CompletionSignal`
//! - `runtime`: `block_on` for synchronous callers
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
