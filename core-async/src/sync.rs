//! Synchronization primitives.
//!
//! Tokio's async-aware locks and channels are re-exported as-is. On top of
//! them this module provides [`CompletionSignal`], a broadcast-once cell:
//! one party publishes a value exactly once and every waiter, whether it
//! subscribed before or after publication, observes that same value.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{CompletionSignal, RwLock};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let lock = RwLock::new(vec![1, 2, 3]);
//!     assert_eq!(lock.read().await.len(), 3);
//!
//!     let signal = Arc::new(CompletionSignal::new());
//!     let waiter = Arc::clone(&signal);
//!     let handle = core_async::task::spawn(async move { waiter.wait().await });
//!
//!     signal.complete("done");
//!     assert_eq!(handle.await.unwrap(), "done");
//! }
//! ```

use std::fmt;

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard, Semaphore, SemaphorePermit,
};

/// A value published exactly once and observed by any number of waiters.
///
/// The first call to [`complete`](Self::complete) wins; later calls are
/// ignored and report `false`. Waiters that arrive after completion resolve
/// immediately with the stored value.
pub struct CompletionSignal<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T> CompletionSignal<T>
where
    T: Clone,
{
    /// Creates a signal that has not completed yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publishes `value` to every current and future waiter.
    ///
    /// Returns `false` if the signal had already completed; the stored value
    /// is left untouched in that case.
    pub fn complete(&self, value: T) -> bool {
        let mut slot = Some(value);
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = slot.take();
            true
        })
    }

    /// Returns `true` once a value has been published.
    pub fn is_complete(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Returns the published value without waiting.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Waits until a value is published and returns a clone of it.
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(value) = current {
                return value;
            }
            // The sender lives in `self`, so the channel stays open while we wait.
            if rx.changed().await.is_err() {
                continue;
            }
        }
    }

    /// Number of waiters currently parked on this signal.
    pub fn waiter_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Default for CompletionSignal<T>
where
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CompletionSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("complete", &self.tx.borrow().is_some())
            .finish()
    }
}
