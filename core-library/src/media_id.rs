//! Hierarchical media ids.
//!
//! Every node of the browse tree is addressed by a flat string token built
//! from three parts:
//!
//! ```text
//! <kind>[/<value>...][|<leaf id>]
//!
//! __ROOT__                         the top of the hierarchy
//! __BY_GENRE__                     the "by genre" category
//! __BY_GENRE__/Rock                one genre (browsable)
//! __BY_GENRE__/Rock|9f86d08...     one track reached through that genre (playable)
//! ```
//!
//! The category path is split on [`CATEGORY_SEPARATOR`]; the leaf id follows
//! the first [`LEAF_SEPARATOR`]. Kinds and values are validated to never
//! contain either separator, so the first `|` in a token is always the leaf
//! delimiter and the leaf id itself is stored verbatim.

use std::fmt;
use std::str::FromStr;

use crate::error::{LibraryError, Result};

/// Separates the category kind and its values.
pub const CATEGORY_SEPARATOR: char = '/';

/// Separates the category path from the leaf (track) id.
pub const LEAF_SEPARATOR: char = '|';

/// Token of the top of the browse hierarchy.
pub const MEDIA_ID_ROOT: &str = "__ROOT__";

/// Category kind for browsing tracks by genre.
pub const MEDIA_ID_MUSICS_BY_GENRE: &str = "__BY_GENRE__";

/// Category kind for queues produced by searches.
pub const MEDIA_ID_MUSICS_BY_SEARCH: &str = "__BY_SEARCH__";

/// Category value of the whole-catalog shuffled queue.
pub const SHUFFLED_CATEGORY_VALUE: &str = "random";

/// Parsed form of a media id token.
///
/// `hierarchy[0]` is the category kind, followed by the category values in
/// encoding order. A `MediaId` built through [`MediaId::new`] or parsed from a
/// token always has at least one hierarchy element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId {
    hierarchy: Vec<String>,
    leaf: Option<String>,
}

impl MediaId {
    /// Builds a media id, validating the category components.
    ///
    /// # Errors
    ///
    /// [`LibraryError::InvalidIdentifierComponent`] if `kind` or any value
    /// contains a reserved separator.
    pub fn new<S: AsRef<str>>(leaf: Option<&str>, kind: &str, values: &[S]) -> Result<Self> {
        let mut hierarchy = Vec::with_capacity(values.len() + 1);
        hierarchy.push(validated(kind)?.to_string());
        for value in values {
            hierarchy.push(validated(value.as_ref())?.to_string());
        }

        Ok(Self {
            hierarchy,
            leaf: leaf.map(str::to_string),
        })
    }

    /// The root of the browse hierarchy.
    pub fn root() -> Self {
        Self {
            hierarchy: vec![MEDIA_ID_ROOT.to_string()],
            leaf: None,
        }
    }

    /// Search category for `query`.
    ///
    /// Reserved separators in the query are replaced by spaces, so this
    /// cannot fail the way [`MediaId::new`] can.
    pub fn for_search(query: &str) -> Self {
        let value = query.replace([CATEGORY_SEPARATOR, LEAF_SEPARATOR], " ");
        Self {
            hierarchy: vec![MEDIA_ID_MUSICS_BY_SEARCH.to_string(), value],
            leaf: None,
        }
    }

    /// Category of the whole-catalog shuffled queue.
    pub fn shuffled() -> Self {
        Self {
            hierarchy: vec![
                MEDIA_ID_MUSICS_BY_SEARCH.to_string(),
                SHUFFLED_CATEGORY_VALUE.to_string(),
            ],
            leaf: None,
        }
    }

    /// Parses a token. Parsing never fails: any string is a well-formed token,
    /// though it may name a category nothing knows about.
    pub fn parse(token: &str) -> Self {
        let (path, leaf) = match token.split_once(LEAF_SEPARATOR) {
            Some((path, leaf)) => (path, Some(leaf.to_string())),
            None => (token, None),
        };

        Self {
            hierarchy: path.split(CATEGORY_SEPARATOR).map(str::to_string).collect(),
            leaf,
        }
    }

    /// Serializes back to the flat token form.
    pub fn encode(&self) -> String {
        let mut token = self.hierarchy.join(&CATEGORY_SEPARATOR.to_string());
        if let Some(leaf) = &self.leaf {
            token.push(LEAF_SEPARATOR);
            token.push_str(leaf);
        }
        token
    }

    /// Category kind followed by all category values.
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }

    /// The category kind, e.g. [`MEDIA_ID_MUSICS_BY_GENRE`].
    pub fn kind(&self) -> &str {
        self.hierarchy.first().map(String::as_str).unwrap_or_default()
    }

    /// The deepest category value, if the id has any.
    pub fn category_value(&self) -> Option<&str> {
        match self.hierarchy.as_slice() {
            [_kind, .., last] => Some(last.as_str()),
            _ => None,
        }
    }

    /// The track id of a playable node.
    pub fn leaf_id(&self) -> Option<&str> {
        self.leaf.as_deref()
    }

    /// Category nodes (no leaf id) are browsable.
    pub fn is_browsable(&self) -> bool {
        self.leaf.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.leaf.is_none() && self.hierarchy.len() == 1 && self.hierarchy[0] == MEDIA_ID_ROOT
    }

    /// One level up the hierarchy.
    ///
    /// A playable id loses its leaf; a category id loses its deepest value;
    /// a bare kind goes to the root, and the root is its own parent.
    pub fn parent(&self) -> MediaId {
        if self.leaf.is_some() {
            return Self {
                hierarchy: self.hierarchy.clone(),
                leaf: None,
            };
        }

        if self.hierarchy.len() <= 1 {
            return Self::root();
        }

        Self {
            hierarchy: self.hierarchy[..self.hierarchy.len() - 1].to_vec(),
            leaf: None,
        }
    }

    /// Same category path, pointing at the given track.
    ///
    /// The caller's leaf is stored verbatim, like in [`MediaId::new`].
    pub fn with_leaf(&self, leaf: &str) -> MediaId {
        Self {
            hierarchy: self.hierarchy.clone(),
            leaf: Some(leaf.to_string()),
        }
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for MediaId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

fn validated(component: &str) -> Result<&str> {
    match component
        .chars()
        .find(|c| *c == CATEGORY_SEPARATOR || *c == LEAF_SEPARATOR)
    {
        Some(separator) => Err(LibraryError::InvalidIdentifierComponent {
            component: component.to_string(),
            separator,
        }),
        None => Ok(component),
    }
}

// ============================================================================
// Token-level helpers
// ============================================================================

/// Encodes `(leaf, kind, values...)` into a token.
///
/// ```
/// use core_library::media_id::{create_media_id, MEDIA_ID_MUSICS_BY_GENRE};
///
/// let token = create_media_id(Some("42"), MEDIA_ID_MUSICS_BY_GENRE, &["Rock"]).unwrap();
/// assert_eq!(token, "__BY_GENRE__/Rock|42");
/// ```
pub fn create_media_id<S: AsRef<str>>(
    leaf: Option<&str>,
    kind: &str,
    values: &[S],
) -> Result<String> {
    MediaId::new(leaf, kind, values).map(|id| id.encode())
}

/// The deepest category value of a token, if it has one.
pub fn extract_category_value(token: &str) -> Option<String> {
    MediaId::parse(token).category_value().map(str::to_string)
}

/// Category kind followed by all values; a leaf segment is ignored.
pub fn category_hierarchy(token: &str) -> Vec<String> {
    MediaId::parse(token).hierarchy
}

/// The leaf (track) id of a playable token.
pub fn extract_leaf_id(token: &str) -> Option<String> {
    MediaId::parse(token).leaf
}

/// Whether the token names a category rather than a track.
pub fn is_browsable(token: &str) -> bool {
    !token.contains(LEAF_SEPARATOR)
}

/// Token of the parent node.
///
/// # Errors
///
/// [`LibraryError::NullIdentifier`] when no token is given.
pub fn parent_media_id(token: Option<&str>) -> Result<String> {
    let token = token.ok_or(LibraryError::NullIdentifier)?;
    Ok(MediaId::parse(token).parent().encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_VALUES: &[&str] = &[];

    #[test]
    fn test_separator_constants() {
        assert_eq!(CATEGORY_SEPARATOR, '/');
        assert_eq!(LEAF_SEPARATOR, '|');
        assert_ne!(CATEGORY_SEPARATOR, LEAF_SEPARATOR);
        for constant in [MEDIA_ID_ROOT, MEDIA_ID_MUSICS_BY_GENRE, MEDIA_ID_MUSICS_BY_SEARCH] {
            assert!(validated(constant).is_ok());
        }
    }

    #[test]
    fn test_encode_layout() {
        let id = MediaId::new(Some("78A_88"), MEDIA_ID_MUSICS_BY_GENRE, &["Classic 70's"]).unwrap();
        assert_eq!(id.encode(), "__BY_GENRE__/Classic 70's|78A_88");

        let browsable = MediaId::new(None, MEDIA_ID_MUSICS_BY_GENRE, NO_VALUES).unwrap();
        assert_eq!(browsable.encode(), "__BY_GENRE__");
    }

    #[test]
    fn test_round_trip() {
        let cases: Vec<(Option<&str>, &str, Vec<&str>)> = vec![
            (Some("78A_88"), "Genre", vec!["Classic 70's"]),
            (None, "Genre", vec!["Classic 70's"]),
            (Some("leaf|with/separators"), "Kind", vec!["a", "b", "c"]),
            (Some(""), "Kind", vec![]),
            (None, "", vec![""]),
        ];

        for (leaf, kind, values) in cases {
            let token = create_media_id(leaf, kind, &values).unwrap();
            assert_eq!(extract_leaf_id(&token).as_deref(), leaf, "leaf of {token}");

            let mut expected = vec![kind.to_string()];
            expected.extend(values.iter().map(|v| v.to_string()));
            assert_eq!(category_hierarchy(&token), expected, "hierarchy of {token}");
        }
    }

    #[test]
    fn test_invalid_components_are_rejected() {
        let result = create_media_id(None, "BY|GENRE/2", &["Classic 70's"]);
        assert!(matches!(
            result,
            Err(LibraryError::InvalidIdentifierComponent { separator: '|', .. })
        ));

        let result = create_media_id(None, MEDIA_ID_MUSICS_BY_GENRE, &["AC/DC"]);
        assert!(matches!(
            result,
            Err(LibraryError::InvalidIdentifierComponent { separator: '/', .. })
        ));
    }

    #[test]
    fn test_leaf_is_not_validated() {
        let token = create_media_id(Some("a/b|c"), MEDIA_ID_MUSICS_BY_GENRE, &["Rock"]).unwrap();
        assert_eq!(extract_leaf_id(&token).as_deref(), Some("a/b|c"));
        assert_eq!(category_hierarchy(&token), vec![MEDIA_ID_MUSICS_BY_GENRE, "Rock"]);
    }

    #[test]
    fn test_category_value() {
        assert_eq!(
            extract_category_value("__BY_GENRE__/Rock|42").as_deref(),
            Some("Rock")
        );
        assert_eq!(
            extract_category_value("__BY_GENRE__/Rock/Sub").as_deref(),
            Some("Sub")
        );
        assert_eq!(extract_category_value("__BY_GENRE__"), None);
        assert_eq!(extract_category_value(MEDIA_ID_ROOT), None);
    }

    #[test]
    fn test_parent_chain_ends_at_root() {
        let leaf = create_media_id(Some("78A_88"), MEDIA_ID_MUSICS_BY_GENRE, &["X"]).unwrap();
        let genre = create_media_id(None, MEDIA_ID_MUSICS_BY_GENRE, &["X"]).unwrap();
        let by_genre = create_media_id(None, MEDIA_ID_MUSICS_BY_GENRE, NO_VALUES).unwrap();

        assert_eq!(parent_media_id(Some(&leaf)).unwrap(), genre);
        assert_eq!(parent_media_id(Some(&genre)).unwrap(), by_genre);
        assert_eq!(parent_media_id(Some(&by_genre)).unwrap(), MEDIA_ID_ROOT);
        assert_eq!(parent_media_id(Some(MEDIA_ID_ROOT)).unwrap(), MEDIA_ID_ROOT);
    }

    #[test]
    fn test_parent_requires_token() {
        assert!(matches!(
            parent_media_id(None),
            Err(LibraryError::NullIdentifier)
        ));
    }

    #[test]
    fn test_browsable_and_root() {
        assert!(is_browsable(MEDIA_ID_ROOT));
        assert!(is_browsable("__BY_GENRE__/Rock"));
        assert!(!is_browsable("__BY_GENRE__/Rock|42"));
        assert!(MediaId::parse(MEDIA_ID_ROOT).is_root());
        assert!(!MediaId::parse("__ROOT__|42").is_root());
    }

    #[test]
    fn test_with_leaf_keeps_category() {
        let genre = MediaId::new(None, MEDIA_ID_MUSICS_BY_GENRE, &["Jazz"]).unwrap();
        let track = genre.with_leaf("abc");
        assert_eq!(track.to_string(), "__BY_GENRE__/Jazz|abc");
        assert_eq!(track.parent(), genre);
        assert_eq!("__BY_GENRE__/Jazz|abc".parse::<MediaId>().unwrap(), track);
    }

    #[test]
    fn test_search_category_replaces_separators() {
        let category = MediaId::for_search("AC/DC|live");
        assert_eq!(category.encode(), "__BY_SEARCH__/AC DC live");
        assert_eq!(category.category_value(), Some("AC DC live"));
        assert_eq!(MediaId::for_search("").encode(), "__BY_SEARCH__/");
    }

    #[test]
    fn test_shuffled_category() {
        assert_eq!(MediaId::shuffled().encode(), "__BY_SEARCH__/random");
        assert_eq!(
            MediaId::shuffled(),
            MediaId::new(None, MEDIA_ID_MUSICS_BY_SEARCH, &[SHUFFLED_CATEGORY_VALUE]).unwrap()
        );
    }
}
