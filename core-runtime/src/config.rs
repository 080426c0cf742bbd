//! # Catalog Configuration Module
//!
//! Provides configuration management for the media catalog.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CatalogConfig`. Every value has a sensible default, so an empty builder
//! yields a working configuration; `build()` validates fail-fast so a bad
//! label template or search policy is rejected at startup rather than
//! surfacing as odd browse output later.
//!
//! ## Settings
//!
//! - `labels` - Human labels for the browse tree's category nodes
//! - `search_fallback` - Fields consulted, in order, when an unstructured
//!   title search finds nothing
//! - `event_buffer_size` - Capacity of the catalog's event bus
//! - `clock` - Time source used to stamp catalog loads
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::{CatalogConfig, SearchField};
//!
//! let config = CatalogConfig::builder()
//!     .genres_title("Genres")
//!     .search_fallback(vec![SearchField::Genre, SearchField::Artist])
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.labels.genres_title, "Genres");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CatalogConfig;
//!
//! // The subtitle template must mention the genre placeholder
//! let config = CatalogConfig::builder()
//!     .genre_subtitle_template("Songs")
//!     .build()
//!     .expect("Should fail - template without {genre}");
//! ```

use crate::error::{Error, Result};
use bridge_traits::time::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Placeholder substituted with the genre name in genre subtitles.
pub const GENRE_PLACEHOLDER: &str = "{genre}";

/// Default event bus capacity.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

const MAX_EVENT_BUFFER_SIZE: usize = 65_536;

/// Track field a search can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    Title,
    Album,
    Artist,
    Genre,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Genre => "genre",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels shown for category nodes of the browse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseLabels {
    /// Title of the single top-level "by genre" node
    pub genres_title: String,
    /// Subtitle of the top-level "by genre" node
    pub genres_subtitle: String,
    /// Subtitle of each genre node; `{genre}` is replaced by the genre name
    pub genre_subtitle_template: String,
}

impl Default for BrowseLabels {
    fn default() -> Self {
        Self {
            genres_title: "Genres".to_string(),
            genres_subtitle: "Songs by genre".to_string(),
            genre_subtitle_template: "{genre} songs".to_string(),
        }
    }
}

impl BrowseLabels {
    /// Renders the subtitle of a genre node.
    pub fn genre_subtitle(&self, genre: &str) -> String {
        self.genre_subtitle_template.replace(GENRE_PLACEHOLDER, genre)
    }

    /// Validates the labels
    pub fn validate(&self) -> Result<()> {
        if self.genres_title.trim().is_empty() {
            return Err(Error::Config("Genres title cannot be empty".to_string()));
        }

        if !self.genre_subtitle_template.contains(GENRE_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "Genre subtitle template must contain '{}'",
                GENRE_PLACEHOLDER
            )));
        }

        Ok(())
    }
}

/// Configuration for a media catalog instance.
///
/// Use [`CatalogConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Browse tree labels
    pub labels: BrowseLabels,

    /// Fields tried after an empty unstructured title search, in order
    pub search_fallback: Vec<SearchField>,

    /// Capacity of the catalog event bus
    pub event_buffer_size: usize,

    /// Time source for load timestamps
    pub clock: Arc<dyn Clock>,
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("labels", &self.labels)
            .field("search_fallback", &self.search_fallback)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("clock", &"Clock { ... }")
            .finish()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            labels: BrowseLabels::default(),
            search_fallback: Vec::new(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            clock: Arc::new(SystemClock),
        }
    }
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Labels are usable (see [`BrowseLabels::validate`])
    /// - The search fallback neither repeats a field nor lists `Title`, which
    ///   is always searched first
    /// - The event buffer is non-zero and bounded
    pub fn validate(&self) -> Result<()> {
        self.labels.validate()?;

        if self.search_fallback.contains(&SearchField::Title) {
            return Err(Error::Config(
                "Search fallback cannot contain 'title'; unstructured searches always \
                 match titles first"
                    .to_string(),
            ));
        }

        for (position, field) in self.search_fallback.iter().enumerate() {
            if self.search_fallback[..position].contains(field) {
                return Err(Error::Config(format!(
                    "Search fallback lists '{}' more than once",
                    field
                )));
            }
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`CatalogConfig`] instances.
#[derive(Default)]
pub struct CatalogConfigBuilder {
    labels: Option<BrowseLabels>,
    genres_title: Option<String>,
    genres_subtitle: Option<String>,
    genre_subtitle_template: Option<String>,
    search_fallback: Option<Vec<SearchField>>,
    event_buffer_size: Option<usize>,
    clock: Option<Arc<dyn Clock>>,
}

impl CatalogConfigBuilder {
    /// Replaces all browse labels at once.
    ///
    /// Individual label setters applied on the builder take precedence.
    pub fn labels(mut self, labels: BrowseLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Sets the title of the top-level "by genre" node.
    ///
    /// Default: "Genres"
    pub fn genres_title(mut self, title: impl Into<String>) -> Self {
        self.genres_title = Some(title.into());
        self
    }

    /// Sets the subtitle of the top-level "by genre" node.
    ///
    /// Default: "Songs by genre"
    pub fn genres_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.genres_subtitle = Some(subtitle.into());
        self
    }

    /// Sets the subtitle template of genre nodes. Must contain `{genre}`.
    ///
    /// Default: "{genre} songs"
    pub fn genre_subtitle_template(mut self, template: impl Into<String>) -> Self {
        self.genre_subtitle_template = Some(template.into());
        self
    }

    /// Sets the fields an unstructured search falls back to, in order, when
    /// no title matches.
    ///
    /// Default: none (title matches only)
    pub fn search_fallback(mut self, fields: Vec<SearchField>) -> Self {
        self.search_fallback = Some(fields);
        self
    }

    /// Sets the event bus capacity.
    ///
    /// Default: 100
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the time source used to stamp catalog loads.
    ///
    /// Default: [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the final `CatalogConfig`, validating it first.
    pub fn build(self) -> Result<CatalogConfig> {
        let mut labels = self.labels.unwrap_or_default();
        if let Some(title) = self.genres_title {
            labels.genres_title = title;
        }
        if let Some(subtitle) = self.genres_subtitle {
            labels.genres_subtitle = subtitle;
        }
        if let Some(template) = self.genre_subtitle_template {
            labels.genre_subtitle_template = template;
        }

        let config = CatalogConfig {
            labels,
            search_fallback: self.search_fallback.unwrap_or_default(),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;

        Ok(config)
    }
}
