//! Immutable lookup indices over one catalog load.
//!
//! A [`CatalogIndex`] is built in one go from the source records and never
//! mutated afterwards; a refresh builds a fresh index and swaps it in whole,
//! so readers only ever see a complete snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use bridge_traits::source::SourceTrack;
use core_runtime::logging::strip_path;
use tracing::debug;

use crate::models::Track;

/// Case-insensitive substring index over one text field.
///
/// Keys are stored lowercased alongside the position of the track they came
/// from, in catalog order.
#[derive(Debug, Default)]
struct SubstringIndex {
    entries: Vec<(String, usize)>,
}

impl SubstringIndex {
    fn push(&mut self, text: &str, position: usize) {
        self.entries.push((text.to_lowercase(), position));
    }

    fn matches<'a>(&'a self, needle: &str) -> impl Iterator<Item = usize> + 'a {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .filter(move |(key, _)| key.contains(needle.as_str()))
            .map(|(_, position)| *position)
    }
}

/// Indices over one loaded record set.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    tracks: Vec<Arc<Track>>,
    by_id: HashMap<String, usize>,
    genres: Vec<String>,
    by_genre: HashMap<String, Vec<usize>>,
    titles: SubstringIndex,
    albums: SubstringIndex,
    artists: SubstringIndex,
}

impl CatalogIndex {
    /// Indexes `records` in source order.
    ///
    /// Records whose derived id was already seen are skipped; the first one
    /// wins.
    pub fn build(records: Vec<SourceTrack>) -> Self {
        let mut index = Self {
            tracks: Vec::with_capacity(records.len()),
            ..Self::default()
        };

        for record in records {
            let track = Track::from_source(record);
            if index.by_id.contains_key(&track.id) {
                debug!(
                    track_id = %track.id,
                    source = strip_path(&track.source_uri),
                    "Skipping duplicate track"
                );
                continue;
            }

            let position = index.tracks.len();
            index.by_id.insert(track.id.clone(), position);

            match index.by_genre.get_mut(&track.genre) {
                Some(positions) => positions.push(position),
                None => {
                    index.genres.push(track.genre.clone());
                    index.by_genre.insert(track.genre.clone(), vec![position]);
                }
            }

            index.titles.push(&track.title, position);
            index.albums.push(&track.album, position);
            index.artists.push(&track.artist, position);
            index.tracks.push(Arc::new(track));
        }

        index
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn track(&self, id: &str) -> Option<Arc<Track>> {
        self.by_id.get(id).map(|&position| Arc::clone(&self.tracks[position]))
    }

    /// Every track, in catalog order.
    pub fn tracks(&self) -> impl Iterator<Item = &Arc<Track>> + '_ {
        self.tracks.iter()
    }

    /// Distinct genres in first-seen order.
    pub fn genres(&self) -> impl Iterator<Item = &str> + '_ {
        self.genres.iter().map(String::as_str)
    }

    /// Tracks of one genre in first-indexed order; empty for unknown genres.
    pub fn tracks_by_genre<'a>(&'a self, genre: &str) -> impl Iterator<Item = &'a Arc<Track>> + 'a {
        self.by_genre
            .get(genre)
            .into_iter()
            .flatten()
            .map(move |&position| &self.tracks[position])
    }

    pub fn search_by_title<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Arc<Track>> + 'a {
        self.resolve(self.titles.matches(needle))
    }

    pub fn search_by_album<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Arc<Track>> + 'a {
        self.resolve(self.albums.matches(needle))
    }

    pub fn search_by_artist<'a>(&'a self, needle: &str) -> impl Iterator<Item = &'a Arc<Track>> + 'a {
        self.resolve(self.artists.matches(needle))
    }

    fn resolve<'a>(
        &'a self,
        positions: impl Iterator<Item = usize> + 'a,
    ) -> impl Iterator<Item = &'a Arc<Track>> + 'a {
        positions.map(move |position| &self.tracks[position])
    }
}
