//! Bundled [`TrackSource`] implementations.
//!
//! - [`StaticTrackSource`]: a fixed in-memory list, restartable by cloning.
//! - [`JsonTrackSource`] (feature `json-source`): the conventional
//!   `{"music": [...]}` catalog document, already loaded into memory.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::source::{SourceTrack, TrackSource};

/// Serves the same records on every fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticTrackSource {
    tracks: Vec<SourceTrack>,
}

impl StaticTrackSource {
    pub fn new(tracks: Vec<SourceTrack>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl FromIterator<SourceTrack> for StaticTrackSource {
    fn from_iter<I: IntoIterator<Item = SourceTrack>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl TrackSource for StaticTrackSource {
    async fn fetch_tracks(&self) -> Result<Vec<SourceTrack>> {
        Ok(self.tracks.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(feature = "json-source")]
pub use json::JsonTrackSource;

#[cfg(feature = "json-source")]
mod json {
    use super::*;
    use bridge_traits::error::BridgeError;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CatalogDocument {
        #[serde(default)]
        music: Vec<JsonTrack>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct JsonTrack {
        #[serde(default)]
        title: String,
        #[serde(default)]
        album: String,
        #[serde(default)]
        artist: String,
        #[serde(default)]
        genre: String,
        source: String,
        #[serde(default)]
        image: String,
        #[serde(default)]
        track_number: u32,
        #[serde(default)]
        total_track_count: u32,
        /// Seconds.
        #[serde(default)]
        duration: u64,
        /// Overrides the source's base URI for this record.
        #[serde(default)]
        site: Option<String>,
    }

    /// Parses a JSON catalog document held in memory.
    ///
    /// ```json
    /// {"music": [{"title": "Jazz in Paris", "album": "Jazz & Blues",
    ///   "artist": "Media Right Productions", "genre": "Jazz & Blues",
    ///   "source": "Jazz_In_Paris.mp3", "image": "album_art.jpg",
    ///   "trackNumber": 1, "totalTrackCount": 6, "duration": 103}]}
    /// ```
    ///
    /// Relative `source` and `image` paths are resolved against `site`, or the
    /// base URI given to [`JsonTrackSource::with_base_uri`].
    #[derive(Debug, Clone)]
    pub struct JsonTrackSource {
        document: String,
        base_uri: Option<String>,
    }

    impl JsonTrackSource {
        pub fn new(document: impl Into<String>) -> Self {
            Self {
                document: document.into(),
                base_uri: None,
            }
        }

        pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
            self.base_uri = Some(base_uri.into());
            self
        }

        fn parse(&self) -> Result<Vec<SourceTrack>> {
            let document: CatalogDocument = serde_json::from_str(&self.document)
                .map_err(|e| BridgeError::InvalidData(format!("Malformed catalog JSON: {}", e)))?;

            Ok(document
                .music
                .into_iter()
                .map(|track| {
                    let base = track.site.as_deref().or(self.base_uri.as_deref());
                    SourceTrack {
                        source_uri: resolve(base, &track.source),
                        art_icon_uri: resolve(base, &track.image),
                        title: track.title,
                        album: track.album,
                        artist: track.artist,
                        genre: track.genre,
                        track_number: track.track_number,
                        total_track_count: track.total_track_count,
                        duration_ms: track.duration.saturating_mul(1000),
                    }
                })
                .collect())
        }
    }

    fn resolve(base: Option<&str>, path: &str) -> String {
        match base {
            Some(base) if !path.is_empty() && !path.contains("://") => {
                format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            }
            _ => path.to_string(),
        }
    }

    #[async_trait]
    impl TrackSource for JsonTrackSource {
        async fn fetch_tracks(&self) -> Result<Vec<SourceTrack>> {
            self.parse()
        }

        fn name(&self) -> &str {
            "json"
        }
    }

}
