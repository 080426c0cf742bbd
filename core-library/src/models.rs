//! Domain models for the media catalog
//!
//! Tracks are immutable once indexed. Per-track mutable state (favorite flag,
//! artwork) lives in side tables owned by the catalog and is exposed through
//! [`TrackOverlay`].

use bridge_traits::source::SourceTrack;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Track
// =============================================================================

/// A catalog track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Lowercase hex SHA-256 of `source_uri`.
    pub id: String,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub genre: String,
    pub source_uri: String,
    pub art_icon_uri: String,
    pub track_number: u32,
    pub total_track_count: u32,
    pub duration_ms: u64,
}

impl Track {
    /// Builds a track from a source record, deriving its id from the source URI.
    pub fn from_source(record: SourceTrack) -> Self {
        Self {
            id: track_id_for(&record.source_uri),
            title: record.title,
            album: record.album,
            artist: record.artist,
            genre: record.genre,
            source_uri: record.source_uri,
            art_icon_uri: record.art_icon_uri,
            track_number: record.track_number,
            total_track_count: record.total_track_count,
            duration_ms: record.duration_ms,
        }
    }
}

/// Stable track id for a source URI.
pub fn track_id_for(source_uri: &str) -> String {
    let digest = Sha256::digest(source_uri.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

// =============================================================================
// Overlay
// =============================================================================

/// Opaque image handle supplied by the host (encoded bytes, never decoded here).
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Artwork(pub Bytes);

impl Artwork {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Artwork({} bytes)", self.0.len())
    }
}

/// Mutable per-track artwork, kept outside the immutable [`Track`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOverlay {
    pub album_art: Option<Artwork>,
    pub display_icon: Option<Artwork>,
}

impl TrackOverlay {
    pub fn is_empty(&self) -> bool {
        self.album_art.is_none() && self.display_icon.is_none()
    }
}

// =============================================================================
// Browse tree
// =============================================================================

/// Whether a browse node opens a category or plays a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowseNodeKind {
    Browsable,
    Playable,
}

/// An entry of the browse tree, as handed to UI and session layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseNode {
    pub media_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon_uri: Option<String>,
    pub kind: BrowseNodeKind,
}

impl BrowseNode {
    pub fn browsable(media_id: String, title: impl Into<String>) -> Self {
        Self {
            media_id,
            title: title.into(),
            subtitle: None,
            icon_uri: None,
            kind: BrowseNodeKind::Browsable,
        }
    }

    pub fn playable(media_id: String, title: impl Into<String>) -> Self {
        Self {
            media_id,
            title: title.into(),
            subtitle: None,
            icon_uri: None,
            kind: BrowseNodeKind::Playable,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon_uri(mut self, icon_uri: impl Into<String>) -> Self {
        let icon_uri = icon_uri.into();
        if !icon_uri.is_empty() {
            self.icon_uri = Some(icon_uri);
        }
        self
    }

    pub fn is_browsable(&self) -> bool {
        self.kind == BrowseNodeKind::Browsable
    }

    pub fn is_playable(&self) -> bool {
        self.kind == BrowseNodeKind::Playable
    }
}

// =============================================================================
// Queues
// =============================================================================

/// One entry of a play queue.
///
/// `queue_id` is the 0-based position assigned when the queue was built and is
/// unique only within that queue. `media_id` records the category the track
/// was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub queue_id: u64,
    pub media_id: String,
    pub track: Arc<Track>,
}

pub type PlayQueue = Vec<QueueItem>;
