//! Track Source Bridge
//!
//! The catalog never fetches music metadata itself. A host supplies it through
//! [`TrackSource`]: a finite, restartable sequence of [`SourceTrack`] records.
//! Every call to [`TrackSource::fetch_tracks`] must yield the complete record
//! set again; the catalog calls it once per refresh and never mutates what it
//! receives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw track record as delivered by the host.
///
/// The catalog derives the stable track id from `source_uri`, so two records
/// with the same URI describe the same track.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceTrack {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub genre: String,
    /// Where the audio lives; the identity of the track.
    pub source_uri: String,
    /// Artwork location, if the host knows one.
    pub art_icon_uri: String,
    pub track_number: u32,
    pub total_track_count: u32,
    pub duration_ms: u64,
}

/// Host-provided source of track records.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::source::{SourceTrack, TrackSource};
/// use bridge_traits::error::Result;
/// use async_trait::async_trait;
///
/// struct MediaStoreSource;
///
/// #[async_trait]
/// impl TrackSource for MediaStoreSource {
///     async fn fetch_tracks(&self) -> Result<Vec<SourceTrack>> {
///         // Query the platform media store
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Returns every record in the source, in source order.
    async fn fetch_tracks(&self) -> Result<Vec<SourceTrack>>;

    /// Short human-readable name used in logs.
    fn name(&self) -> &str {
        "track-source"
    }
}
