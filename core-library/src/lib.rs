//! # Media Catalog Module
//!
//! Owns the track catalog and everything derived from it.
//!
//! ## Overview
//!
//! This module manages:
//! - Hierarchical media ids for browse nodes (`media_id`)
//! - Genre and case-insensitive title/album/artist indices (`index`)
//! - The catalog store with its load lifecycle and favorite/artwork overlays (`catalog`)
//! - Browse tree materialization (`browse`)
//! - Play queues built from browse nodes, searches or the whole catalog (`queue`)
//! - Bundled track sources (`source`)

pub mod browse;
pub mod catalog;
pub mod error;
pub mod index;
pub mod media_id;
pub mod models;
pub mod queue;
pub mod source;

pub use browse::LabelResolver;
pub use catalog::{CatalogState, CatalogStats, MusicCatalog};
pub use error::{LibraryError, Result};
pub use index::CatalogIndex;
pub use media_id::MediaId;
pub use models::{Artwork, BrowseNode, BrowseNodeKind, PlayQueue, QueueItem, Track, TrackOverlay};
pub use queue::{QueueKey, SearchExtras, SearchFocus};
#[cfg(feature = "json-source")]
pub use source::JsonTrackSource;
pub use source::StaticTrackSource;
