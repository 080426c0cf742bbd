//! # Queue Builder
//!
//! Turns a browse location or a search into a play queue.
//!
//! Every [`QueueItem`] carries a media id that records where the track was
//! found (`__BY_GENRE__/Jazz|<id>`, `__BY_SEARCH__/blue|<id>`, ...) and a
//! `queue_id` equal to its position at construction time.
//!
//! ## Search precedence
//!
//! A search with an explicit [`SearchFocus`] consults the matching index
//! first. Unfocused searches, and focused searches that found nothing, match
//! song titles; only if no title matches are the configured fallback fields
//! tried, in order.

use std::sync::Arc;

use core_runtime::config::SearchField;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::MusicCatalog;
use crate::media_id::{MediaId, MEDIA_ID_MUSICS_BY_GENRE};
use crate::models::{PlayQueue, QueueItem, Track};

/// Which field a voice or structured search targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchFocus {
    #[default]
    Unstructured,
    Artist,
    Album,
    Genre,
    Title,
}

/// Structured hints accompanying a search query.
///
/// Field values override the free-text query for the focused field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchExtras {
    pub focus: SearchFocus,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub title: Option<String>,
}

impl SearchExtras {
    pub fn artist(artist: impl Into<String>) -> Self {
        Self {
            focus: SearchFocus::Artist,
            artist: Some(artist.into()),
            ..Self::default()
        }
    }

    pub fn album(album: impl Into<String>) -> Self {
        Self {
            focus: SearchFocus::Album,
            album: Some(album.into()),
            ..Self::default()
        }
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            focus: SearchFocus::Genre,
            genre: Some(genre.into()),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            focus: SearchFocus::Title,
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Key for [`position_in_queue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKey<'a> {
    MediaId(&'a str),
    QueueId(u64),
}

impl<'a> From<&'a str> for QueueKey<'a> {
    fn from(media_id: &'a str) -> Self {
        QueueKey::MediaId(media_id)
    }
}

impl From<u64> for QueueKey<'_> {
    fn from(queue_id: u64) -> Self {
        QueueKey::QueueId(queue_id)
    }
}

/// Queue of every track reachable from a browse node.
///
/// Only genre nodes (or tracks reached through one) produce a queue; other
/// categories yield an empty queue.
pub fn queue_for_media_id(media_id: &str, catalog: &MusicCatalog) -> PlayQueue {
    let id = MediaId::parse(media_id);

    match id.hierarchy() {
        [kind, genre] if kind == MEDIA_ID_MUSICS_BY_GENRE => {
            let tracks = catalog.tracks_by_genre(genre);
            build_queue(tracks, &id)
        }
        _ => {
            warn!(media_id, "Unsupported category for a play queue");
            Vec::new()
        }
    }
}

/// Queue of the tracks matching a search.
pub fn queue_for_search(query: &str, extras: &SearchExtras, catalog: &MusicCatalog) -> PlayQueue {
    debug!(query, focus = ?extras.focus, "Building search queue");

    let focused = match extras.focus {
        SearchFocus::Unstructured => Vec::new(),
        SearchFocus::Artist => catalog.search_by_artist(extras.artist.as_deref().unwrap_or(query)),
        SearchFocus::Album => catalog.search_by_album(extras.album.as_deref().unwrap_or(query)),
        SearchFocus::Genre => catalog.tracks_by_genre(extras.genre.as_deref().unwrap_or(query)),
        SearchFocus::Title => catalog.search_by_title(extras.title.as_deref().unwrap_or(query)),
    };

    let tracks = if focused.is_empty() {
        unstructured_search(query, catalog)
    } else {
        focused
    };

    build_queue(tracks, &MediaId::for_search(query))
}

fn unstructured_search(query: &str, catalog: &MusicCatalog) -> Vec<Arc<Track>> {
    let by_title = catalog.search_by_title(query);
    if !by_title.is_empty() {
        return by_title;
    }

    for field in &catalog.config().search_fallback {
        let tracks = match field {
            SearchField::Title => continue,
            SearchField::Album => catalog.search_by_album(query),
            SearchField::Artist => catalog.search_by_artist(query),
            SearchField::Genre => catalog.tracks_by_genre(query),
        };
        if !tracks.is_empty() {
            debug!(query, field = %field, "Search matched fallback field");
            return tracks;
        }
    }

    Vec::new()
}

/// The whole catalog in random order.
pub fn random_queue(catalog: &MusicCatalog) -> PlayQueue {
    build_queue(catalog.shuffled_tracks(), &MediaId::shuffled())
}

fn build_queue(tracks: impl IntoIterator<Item = Arc<Track>>, category: &MediaId) -> PlayQueue {
    tracks
        .into_iter()
        .zip(0u64..)
        .map(|(track, queue_id)| QueueItem {
            queue_id,
            media_id: category.with_leaf(&track.id).encode(),
            track,
        })
        .collect()
}

/// Position of the first item matching `key`, or `None`.
pub fn position_in_queue<'a>(queue: &[QueueItem], key: impl Into<QueueKey<'a>>) -> Option<usize> {
    match key.into() {
        QueueKey::MediaId(media_id) => queue.iter().position(|item| item.media_id == media_id),
        QueueKey::QueueId(queue_id) => queue.iter().position(|item| item.queue_id == queue_id),
    }
}

/// Whether `index` addresses an item of `queue`.
pub fn is_playable_index(index: i64, queue: &[QueueItem]) -> bool {
    usize::try_from(index).map_or(false, |index| index < queue.len())
}

/// Same length and, item by item, the same queue id and media id.
pub fn queues_equal(a: &[QueueItem], b: &[QueueItem]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.queue_id == y.queue_id && x.media_id == y.media_id)
}
