//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-library`, `core-runtime`). Host applications can depend on
//! `media-catalog-workspace` and enable the documented features instead of
//! wiring each crate individually.

#[cfg(feature = "catalog")]
pub use core_library as catalog;

#[cfg(feature = "catalog")]
pub use core_runtime as runtime;
