use std::sync::Arc;

use bridge_traits::source::SourceTrack;
use core_library::media_id::{
    category_hierarchy, create_media_id, extract_leaf_id, MEDIA_ID_MUSICS_BY_GENRE,
    MEDIA_ID_MUSICS_BY_SEARCH, MEDIA_ID_ROOT, SHUFFLED_CATEGORY_VALUE,
};
use core_library::queue::{
    is_playable_index, position_in_queue, queue_for_media_id, queue_for_search, queues_equal,
    random_queue,
};
use core_library::{MusicCatalog, QueueKey, SearchExtras, StaticTrackSource};
use core_runtime::config::{CatalogConfig, SearchField};

fn seed(title: &str, album: &str, artist: &str, genre: &str, n: u32) -> SourceTrack {
    SourceTrack {
        title: title.to_string(),
        album: album.to_string(),
        artist: artist.to_string(),
        genre: genre.to_string(),
        source_uri: format!("https://media.example.org/{}.mp3", n),
        track_number: n,
        total_track_count: 5,
        duration_ms: 120_000,
        ..Default::default()
    }
}

fn seeded_tracks() -> Vec<SourceTrack> {
    vec![
        seed("Music 3", "Album 1", "Smith Singer", "Genre 1", 1),
        seed("Music 1", "Album 1", "Joe Singer", "Genre 1", 2),
        seed("Music 2", "Album 2", "Joe Singer", "Genre 1", 3),
        seed("Romantic Song 1", "Album 3", "Joe Singer", "Genre 2", 4),
        seed("Romantic Song 2", "Album 3", "John Singer", "Genre 2", 5),
    ]
}

async fn catalog_with(config: CatalogConfig) -> MusicCatalog {
    let source = Arc::new(StaticTrackSource::new(seeded_tracks()));
    let catalog = MusicCatalog::new(source, config).unwrap();
    catalog.refresh().await.unwrap();
    catalog
}

async fn catalog() -> MusicCatalog {
    catalog_with(CatalogConfig::default()).await
}

fn genre_media_id(genre: &str) -> String {
    create_media_id(None, MEDIA_ID_MUSICS_BY_GENRE, &[genre]).unwrap()
}

#[core_async::test]
async fn test_genre_queue_sorted_by_title() {
    let catalog = catalog().await;

    let mut queue = queue_for_media_id(&genre_media_id("Genre 1"), &catalog);
    assert_eq!(queue.len(), 3);

    queue.sort_by(|a, b| a.track.title.cmp(&b.track.title));
    let titles: Vec<_> = queue.iter().map(|item| item.track.title.as_str()).collect();
    assert_eq!(titles, vec!["Music 1", "Music 2", "Music 3"]);
}

#[core_async::test]
async fn test_genre_queue_items_keep_origin() {
    let catalog = catalog().await;
    let queue = queue_for_media_id(&genre_media_id("Genre 2"), &catalog);

    for (position, item) in queue.iter().enumerate() {
        assert_eq!(item.queue_id, position as u64);
        assert_eq!(
            category_hierarchy(&item.media_id),
            vec![MEDIA_ID_MUSICS_BY_GENRE, "Genre 2"]
        );
        assert_eq!(extract_leaf_id(&item.media_id).as_deref(), Some(item.track.id.as_str()));
    }
}

#[core_async::test]
async fn test_queue_from_leaf_token_uses_its_genre() {
    let catalog = catalog().await;
    let track = &catalog.search_by_title("Romantic Song 1")[0];
    let leaf = create_media_id(Some(&track.id), MEDIA_ID_MUSICS_BY_GENRE, &["Genre 2"]).unwrap();

    let queue = queue_for_media_id(&leaf, &catalog);
    assert_eq!(queue.len(), 2);
    assert!(position_in_queue(&queue, leaf.as_str()).is_some());
}

#[core_async::test]
async fn test_unsupported_categories_yield_empty_queue() {
    let catalog = catalog().await;

    assert!(queue_for_media_id(MEDIA_ID_ROOT, &catalog).is_empty());
    assert!(queue_for_media_id(MEDIA_ID_MUSICS_BY_GENRE, &catalog).is_empty());
    assert!(queue_for_media_id(&genre_media_id("XYZ"), &catalog).is_empty());
    let album = create_media_id(None, "__BY_ALBUM__", &["Album 1"]).unwrap();
    assert!(queue_for_media_id(&album, &catalog).is_empty());
}

#[core_async::test]
async fn test_position_lookup_matches_list_position() {
    let catalog = catalog().await;
    let queue = queue_for_media_id(&genre_media_id("Genre 1"), &catalog);

    for (position, item) in queue.iter().enumerate() {
        assert_eq!(position_in_queue(&queue, item.media_id.as_str()), Some(position));
        assert_eq!(position_in_queue(&queue, item.queue_id), Some(position));
        assert_eq!(position_in_queue(&queue, QueueKey::QueueId(item.queue_id)), Some(position));
    }

    assert_eq!(position_in_queue(&queue, "__BY_GENRE__/Genre 1|missing"), None);
    assert_eq!(position_in_queue(&queue, 99u64), None);
}

#[core_async::test]
async fn test_playable_index_bounds() {
    let catalog = catalog().await;
    let queue = queue_for_media_id(&genre_media_id("Genre 1"), &catalog);
    let len = queue.len() as i64;

    assert!(!is_playable_index(-1, &queue));
    assert!(!is_playable_index(len, &queue));
    assert!(!is_playable_index(i64::MAX, &queue));
    assert!(is_playable_index(0, &queue));
    assert!(is_playable_index(len - 1, &queue));
}

#[core_async::test]
async fn test_unstructured_search_matches_titles() {
    let catalog = catalog().await;

    let queue = queue_for_search("romantic", &SearchExtras::default(), &catalog);
    assert_eq!(queue.len(), 2);
    for item in &queue {
        assert!(item.track.title.starts_with("Romantic"));
        assert_eq!(
            category_hierarchy(&item.media_id),
            vec![MEDIA_ID_MUSICS_BY_SEARCH, "romantic"]
        );
    }
}

#[core_async::test]
async fn test_title_takes_precedence_over_fallback() {
    let config = CatalogConfig::builder()
        .search_fallback(vec![SearchField::Artist])
        .build()
        .unwrap();
    let catalog = catalog_with(config).await;

    // Title matches win; the artist fallback is not consulted.
    let queue = queue_for_search("Music", &SearchExtras::default(), &catalog);
    assert_eq!(queue.len(), 3);
    assert!(queue.iter().all(|item| item.track.title.starts_with("Music")));
}

#[core_async::test]
async fn test_fallback_fields_only_when_configured() {
    let default_catalog = catalog().await;
    assert!(queue_for_search("Joe", &SearchExtras::default(), &default_catalog).is_empty());

    let config = CatalogConfig::builder()
        .search_fallback(vec![SearchField::Genre, SearchField::Artist])
        .build()
        .unwrap();
    let catalog = catalog_with(config).await;
    let queue = queue_for_search("Joe", &SearchExtras::default(), &catalog);
    assert_eq!(queue.len(), 3);
    assert!(queue.iter().all(|item| item.track.artist == "Joe Singer"));
}

#[core_async::test]
async fn test_artist_focused_search() {
    let catalog = catalog().await;

    let queue = queue_for_search("play something by joe", &SearchExtras::artist("Joe"), &catalog);
    assert_eq!(queue.len(), 3);
    assert!(queue.iter().all(|item| item.track.artist == "Joe Singer"));
}

#[core_async::test]
async fn test_focused_search_without_match_falls_back_to_titles() {
    let catalog = catalog().await;

    let queue = queue_for_search("Romantic", &SearchExtras::album("XYZ"), &catalog);
    assert_eq!(queue.len(), 2);
}

#[core_async::test]
async fn test_search_queue_tolerates_separators_in_query() {
    let catalog = catalog().await;

    let queue = queue_for_search("Music/1", &SearchExtras::genre("Genre 1"), &catalog);
    assert_eq!(queue.len(), 3);
    assert_eq!(
        category_hierarchy(&queue[0].media_id),
        vec![MEDIA_ID_MUSICS_BY_SEARCH, "Music 1"]
    );
}

#[core_async::test]
async fn test_random_queue_covers_catalog() {
    let catalog = catalog().await;

    let queue = random_queue(&catalog);
    assert_eq!(queue.len(), 5);

    let mut ids: Vec<_> = queue.iter().map(|item| item.track.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);

    for (position, item) in queue.iter().enumerate() {
        assert_eq!(item.queue_id, position as u64);
        assert_eq!(
            category_hierarchy(&item.media_id),
            vec![MEDIA_ID_MUSICS_BY_SEARCH, SHUFFLED_CATEGORY_VALUE]
        );
    }
}

#[core_async::test]
async fn test_rebuilt_queue_is_equal() {
    let catalog = catalog().await;
    let media_id = genre_media_id("Genre 1");

    let first = queue_for_media_id(&media_id, &catalog);
    let second = queue_for_media_id(&media_id, &catalog);
    assert!(queues_equal(&first, &second));

    let other = queue_for_media_id(&genre_media_id("Genre 2"), &catalog);
    assert!(!queues_equal(&first, &other));
}
