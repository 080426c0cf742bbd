//! Browse tree materialization.
//!
//! ```text
//! __ROOT__
//! └── __BY_GENRE__                    "Genres"
//!     ├── __BY_GENRE__/Jazz           "Jazz"
//!     │   ├── __BY_GENRE__/Jazz|<id>  track title (playable)
//!     │   └── ...
//!     └── __BY_GENRE__/Rock
//! ```
//!
//! Anything outside this shape (leaf tokens, unknown kinds, deeper paths)
//! has no children.

use tracing::warn;

use core_runtime::config::BrowseLabels;

use crate::index::CatalogIndex;
use crate::media_id::{MediaId, MEDIA_ID_MUSICS_BY_GENRE};
use crate::models::BrowseNode;

/// Supplies human labels for category nodes.
pub trait LabelResolver: Send + Sync {
    fn genres_title(&self) -> String;

    fn genres_subtitle(&self) -> Option<String> {
        None
    }

    fn genre_subtitle(&self, _genre: &str) -> Option<String> {
        None
    }
}

impl LabelResolver for BrowseLabels {
    fn genres_title(&self) -> String {
        self.genres_title.clone()
    }

    fn genres_subtitle(&self) -> Option<String> {
        Some(self.genres_subtitle.clone()).filter(|s| !s.is_empty())
    }

    fn genre_subtitle(&self, genre: &str) -> Option<String> {
        Some(BrowseLabels::genre_subtitle(self, genre))
    }
}

/// Children of `media_id` in the browse tree over `index`.
pub fn browse_children(index: &CatalogIndex, media_id: &str, labels: &dyn LabelResolver) -> Vec<BrowseNode> {
    let id = MediaId::parse(media_id);
    if !id.is_browsable() {
        return Vec::new();
    }

    if id.is_root() {
        let mut node = BrowseNode::browsable(MEDIA_ID_MUSICS_BY_GENRE.to_string(), labels.genres_title());
        if let Some(subtitle) = labels.genres_subtitle() {
            node = node.with_subtitle(subtitle);
        }
        return vec![node];
    }

    match id.hierarchy() {
        [kind] if kind == MEDIA_ID_MUSICS_BY_GENRE => genre_nodes(index, labels),
        [kind, genre] if kind == MEDIA_ID_MUSICS_BY_GENRE => index
            .tracks_by_genre(genre)
            .map(|track| {
                BrowseNode::playable(id.with_leaf(&track.id).encode(), track.title.clone())
                    .with_subtitle(track.artist.clone())
                    .with_icon_uri(track.art_icon_uri.clone())
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn genre_nodes(index: &CatalogIndex, labels: &dyn LabelResolver) -> Vec<BrowseNode> {
    index
        .genres()
        .filter_map(|genre| match MediaId::new(None, MEDIA_ID_MUSICS_BY_GENRE, &[genre]) {
            Ok(id) => {
                let mut node = BrowseNode::browsable(id.encode(), genre);
                if let Some(subtitle) = labels.genre_subtitle(genre) {
                    node = node.with_subtitle(subtitle);
                }
                Some(node)
            }
            Err(e) => {
                warn!(genre, error = %e, "Genre cannot be browsed");
                None
            }
        })
        .collect()
}
