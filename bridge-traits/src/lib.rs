//! # Host Bridge Traits
//!
//! Contracts between the catalog core and the host platform.
//!
//! ## Overview
//!
//! The catalog engine owns indexing, browsing and queue building. Everything
//! that depends on the platform is injected through the traits in this crate:
//!
//! - [`TrackSource`](source::TrackSource) - Supplies the raw track records
//!   (media store scan, bundled JSON, remote catalog cached by the host, ...)
//! - [`LoggerSink`](time::LoggerSink) - Receives structured logs for the host logger
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with an actionable message; the
//! catalog surfaces source failures to the `refresh` caller without discarding
//! previously loaded data.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind an `Arc`.

pub mod error;
pub mod source;
pub mod time;

pub use error::BridgeError;

pub use source::{SourceTrack, TrackSource};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
