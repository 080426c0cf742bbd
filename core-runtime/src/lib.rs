//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the media catalog:
//! - Logging and tracing infrastructure
//! - Catalog configuration
//! - Event bus system
//!
//! ## Overview
//!
//! `core-library` builds on this crate for its configuration values, for
//! broadcasting catalog lifecycle events, and for the logging conventions
//! shared across the workspace.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{BrowseLabels, CatalogConfig, CatalogConfigBuilder, SearchField};
pub use error::{Error, Result};
pub use events::{CatalogEvent, CoreEvent, EventBus, EventStream};
