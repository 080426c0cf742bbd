//! # Catalog Store
//!
//! [`MusicCatalog`] owns the track records of one [`TrackSource`], the lookup
//! indices built over them and the per-track overlays (favorites, artwork).
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──refresh──▶ Loading ──ok──▶ Ready ◀──┐
//!                               │                │     │ ok / failed (stale data kept)
//!                               │ failed         └─refresh─▶ Loading
//!                               ▼
//!                             Failed ──refresh──▶ Loading
//! ```
//!
//! Only one load runs at a time. A `refresh` issued while another is in
//! flight joins it and resolves with the same outcome. Indices are built off
//! the async workers and swapped in as one immutable snapshot, so readers
//! either see the previous load or the new one, never a partial index.
//!
//! Reads never block: before the first successful load they return empty
//! results. Callers that need data wait explicitly with
//! [`MusicCatalog::wait_until_ready`] or [`MusicCatalog::ensure_ready`].
//!
//! ## Example
//!
//! ```ignore
//! use core_library::catalog::MusicCatalog;
//! use core_runtime::config::CatalogConfig;
//!
//! let catalog = MusicCatalog::new(source, CatalogConfig::default())?;
//! catalog.refresh().await?;
//! for genre in catalog.genres() {
//!     println!("{genre}: {} tracks", catalog.tracks_by_genre(&genre).len());
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bridge_traits::source::TrackSource;
use chrono::{DateTime, Utc};
use core_async::sync::{watch, CompletionSignal};
use core_async::task::{self, JoinHandle};
use core_runtime::config::CatalogConfig;
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus, EventStream};
use rand::seq::SliceRandom;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::browse::{self, LabelResolver};
use crate::error::{LibraryError, Result};
use crate::index::CatalogIndex;
use crate::models::{Artwork, BrowseNode, Track, TrackOverlay};

/// Load state of a [`MusicCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogState {
    /// No load has been attempted.
    Uninitialized,
    /// A load is in flight.
    Loading,
    /// A load completed; indices are readable.
    Ready,
    /// The first load failed; nothing is readable yet.
    Failed,
}

#[derive(Debug, Clone)]
struct Lifecycle {
    state: CatalogState,
    /// Bumped every time a load ends: success, failure or cancellation.
    generation: u64,
    last_error: Option<String>,
}

/// Counters describing the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub track_count: usize,
    pub genre_count: usize,
    pub favorite_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub generation: u64,
}

#[derive(Default)]
struct CatalogData {
    index: Arc<CatalogIndex>,
    favorites: HashSet<String>,
    artwork: HashMap<String, TrackOverlay>,
    loaded_at: Option<DateTime<Utc>>,
}

type LoadOutcome = std::result::Result<usize, String>;

/// The catalog store.
pub struct MusicCatalog {
    source: Arc<dyn TrackSource>,
    config: CatalogConfig,
    events: EventBus,
    data: RwLock<CatalogData>,
    lifecycle: watch::Sender<Lifecycle>,
    in_flight: Mutex<Option<Arc<CompletionSignal<LoadOutcome>>>>,
}

impl MusicCatalog {
    /// Creates an empty catalog over `source`, with its own event bus.
    pub fn new(source: Arc<dyn TrackSource>, config: CatalogConfig) -> Result<Self> {
        let events = EventBus::new(config.event_buffer_size);
        Self::with_event_bus(source, config, events)
    }

    /// Creates an empty catalog that publishes on a shared event bus.
    pub fn with_event_bus(
        source: Arc<dyn TrackSource>,
        config: CatalogConfig,
        events: EventBus,
    ) -> Result<Self> {
        config.validate()?;

        let (lifecycle, _) = watch::channel(Lifecycle {
            state: CatalogState::Uninitialized,
            generation: 0,
            last_error: None,
        });

        Ok(Self {
            source,
            config,
            events,
            data: RwLock::new(CatalogData::default()),
            lifecycle,
            in_flight: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn state(&self) -> CatalogState {
        self.lifecycle.borrow().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == CatalogState::Ready
    }

    /// Number of loads that have ended so far, including cancelled ones.
    pub fn generation(&self) -> u64 {
        self.lifecycle.borrow().generation
    }

    /// Loads the track source and swaps in fresh indices.
    ///
    /// Returns the number of indexed tracks. Favorites are cleared; artwork
    /// overlays survive for tracks that are still present.
    ///
    /// # Errors
    ///
    /// [`LibraryError::SourceLoadFailure`] if the source fails. The previous
    /// snapshot stays readable in that case.
    pub async fn refresh(&self) -> Result<usize> {
        let (signal, leader) = {
            let mut in_flight = self.lock_in_flight();
            match in_flight.as_ref() {
                Some(signal) => (Arc::clone(signal), false),
                None => {
                    let signal = Arc::new(CompletionSignal::new());
                    *in_flight = Some(Arc::clone(&signal));
                    (signal, true)
                }
            }
        };

        if !leader {
            debug!("Joining in-flight catalog refresh");
            return signal.wait().await.map_err(LibraryError::SourceLoadFailure);
        }

        let span = info_span!("catalog_refresh", source = self.source.name());
        self.run_refresh(signal).instrument(span).await
    }

    async fn run_refresh(&self, signal: Arc<CompletionSignal<LoadOutcome>>) -> Result<usize> {
        let previous = self.state();
        let guard = LoadGuard {
            catalog: self,
            signal,
            previous,
            armed: true,
        };

        self.lifecycle.send_modify(|l| l.state = CatalogState::Loading);
        self.emit(CatalogEvent::RefreshStarted);
        info!("Refreshing catalog");

        match self.load().await {
            Ok(index) => {
                let track_count = index.track_count();
                let genre_count = index.genre_count();
                self.install(index);

                self.lifecycle.send_modify(|l| {
                    l.state = CatalogState::Ready;
                    l.generation += 1;
                    l.last_error = None;
                });
                info!(track_count, genre_count, "Catalog ready");
                self.emit(CatalogEvent::Ready {
                    track_count,
                    genre_count,
                });

                guard.finish(Ok(track_count));
                Ok(track_count)
            }
            Err(err) => {
                let message = err.to_string();
                let stale_data_kept = self.read_data().loaded_at.is_some();
                let next = if stale_data_kept {
                    CatalogState::Ready
                } else {
                    CatalogState::Failed
                };

                self.lifecycle.send_modify(|l| {
                    l.state = next;
                    l.generation += 1;
                    l.last_error = Some(message.clone());
                });
                warn!(error = %message, stale_data_kept, "Catalog refresh failed");
                self.emit(CatalogEvent::RefreshFailed {
                    message: message.clone(),
                    stale_data_kept,
                });

                guard.finish(Err(message));
                Err(err)
            }
        }
    }

    async fn load(&self) -> Result<CatalogIndex> {
        let records = self
            .source
            .fetch_tracks()
            .await
            .map_err(|e| LibraryError::SourceLoadFailure(e.to_string()))?;
        debug!(record_count = records.len(), "Fetched track records");

        let index = task::spawn_blocking(move || CatalogIndex::build(records)).await?;
        Ok(index)
    }

    fn install(&self, index: CatalogIndex) {
        let index = Arc::new(index);
        let loaded_at = self.config.clock.now();

        let mut data = self.write_data();
        data.favorites.clear();
        data.artwork.retain(|id, _| index.contains(id));
        data.index = index;
        data.loaded_at = Some(loaded_at);
    }

    /// Waits until the catalog is readable.
    ///
    /// Resolves immediately when already `Ready`. Otherwise waits for the
    /// next load to end and fails unless it left the catalog `Ready`; a
    /// cancelled first load fails waiters with its cancellation message.
    pub async fn wait_until_ready(&self) -> Result<()> {
        let mut rx = self.lifecycle.subscribe();
        let start = rx.borrow().generation;

        let lifecycle = rx
            .wait_for(|l| {
                l.state == CatalogState::Ready
                    || (l.state != CatalogState::Loading && l.generation > start)
            })
            .await
            .map_err(|_| {
                LibraryError::Runtime(core_runtime::Error::Internal(
                    "Catalog lifecycle channel closed".to_string(),
                ))
            })?
            .clone();

        match lifecycle.state {
            CatalogState::Ready => Ok(()),
            _ => Err(LibraryError::SourceLoadFailure(
                lifecycle.last_error.unwrap_or_default(),
            )),
        }
    }

    /// Makes the catalog readable, loading it if no load succeeded yet.
    pub async fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            CatalogState::Ready => Ok(()),
            CatalogState::Loading => self.wait_until_ready().await,
            CatalogState::Uninitialized | CatalogState::Failed => self.refresh().await.map(|_| ()),
        }
    }

    /// Runs [`refresh`](Self::refresh) on the runtime without blocking the caller.
    pub fn refresh_in_background(self: &Arc<Self>) -> JoinHandle<Result<usize>> {
        let catalog = Arc::clone(self);
        task::spawn(async move { catalog.refresh().await })
    }

    pub fn stats(&self) -> CatalogStats {
        let generation = self.generation();
        let data = self.read_data();
        CatalogStats {
            track_count: data.index.track_count(),
            genre_count: data.index.genre_count(),
            favorite_count: data.favorites.len(),
            loaded_at: data.loaded_at,
            generation,
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// The current immutable index. Use it for lazy iteration over a
    /// consistent view across several lookups.
    pub fn snapshot(&self) -> Arc<CatalogIndex> {
        Arc::clone(&self.read_data().index)
    }

    pub fn genres(&self) -> Vec<String> {
        self.snapshot().genres().map(str::to_string).collect()
    }

    pub fn tracks_by_genre(&self, genre: &str) -> Vec<Arc<Track>> {
        self.snapshot().tracks_by_genre(genre).cloned().collect()
    }

    pub fn search_by_title(&self, needle: &str) -> Vec<Arc<Track>> {
        self.snapshot().search_by_title(needle).cloned().collect()
    }

    pub fn search_by_album(&self, needle: &str) -> Vec<Arc<Track>> {
        self.snapshot().search_by_album(needle).cloned().collect()
    }

    pub fn search_by_artist(&self, needle: &str) -> Vec<Arc<Track>> {
        self.snapshot().search_by_artist(needle).cloned().collect()
    }

    pub fn track(&self, id: &str) -> Option<Arc<Track>> {
        self.snapshot().track(id)
    }

    /// Every track exactly once, in random order.
    pub fn shuffled_tracks(&self) -> std::vec::IntoIter<Arc<Track>> {
        let mut tracks: Vec<_> = self.snapshot().tracks().cloned().collect();
        tracks.shuffle(&mut rand::thread_rng());
        tracks.into_iter()
    }

    /// Children of a browse node, labelled with the configured labels.
    pub fn browse_children(&self, media_id: &str) -> Vec<BrowseNode> {
        self.browse_children_with(media_id, &self.config.labels)
    }

    pub fn browse_children_with(&self, media_id: &str, labels: &dyn LabelResolver) -> Vec<BrowseNode> {
        browse::browse_children(&self.snapshot(), media_id, labels)
    }

    // ------------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------------

    /// Marks or unmarks a track as favorite. Unknown ids are ignored.
    pub fn set_favorite(&self, id: &str, favorite: bool) {
        let changed = {
            let mut data = self.write_data();
            if !data.index.contains(id) {
                debug!(track_id = id, "Ignoring favorite for unknown track");
                return;
            }
            if favorite {
                data.favorites.insert(id.to_string())
            } else {
                data.favorites.remove(id)
            }
        };

        if changed {
            self.emit(CatalogEvent::FavoriteChanged {
                track_id: id.to_string(),
                favorite,
            });
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.read_data().favorites.contains(id)
    }

    /// Replaces the artwork overlay of a track. Unknown ids are ignored.
    pub fn update_artwork(&self, id: &str, album_art: Option<Artwork>, display_icon: Option<Artwork>) {
        {
            let mut data = self.write_data();
            if !data.index.contains(id) {
                debug!(track_id = id, "Ignoring artwork for unknown track");
                return;
            }
            let overlay = TrackOverlay {
                album_art,
                display_icon,
            };
            if overlay.is_empty() {
                data.artwork.remove(id);
            } else {
                data.artwork.insert(id.to_string(), overlay);
            }
        }

        self.emit(CatalogEvent::ArtworkUpdated {
            track_id: id.to_string(),
        });
    }

    pub fn artwork(&self, id: &str) -> Option<TrackOverlay> {
        self.read_data().artwork.get(id).cloned()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn emit(&self, event: CatalogEvent) {
        // No subscribers is fine.
        self.events.emit(CoreEvent::Catalog(event)).ok();
    }

    fn read_data(&self) -> RwLockReadGuard<'_, CatalogData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_data(&self) -> RwLockWriteGuard<'_, CatalogData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<Arc<CompletionSignal<LoadOutcome>>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ends an in-flight load. If the refresh future is dropped before
/// `finish`, the previous state is restored and joined callers are released
/// with an error.
struct LoadGuard<'a> {
    catalog: &'a MusicCatalog,
    signal: Arc<CompletionSignal<LoadOutcome>>,
    previous: CatalogState,
    armed: bool,
}

impl LoadGuard<'_> {
    fn finish(mut self, outcome: LoadOutcome) {
        self.armed = false;
        self.catalog.lock_in_flight().take();
        self.signal.complete(outcome);
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        warn!("Catalog refresh cancelled");
        let message = "Catalog refresh was cancelled".to_string();
        let previous = self.previous;
        self.catalog.lifecycle.send_modify(|l| {
            l.state = previous;
            l.generation += 1;
            l.last_error = Some(message.clone());
        });
        self.catalog.lock_in_flight().take();
        self.signal.complete(Err(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bridge_traits::source::SourceTrack;
    use core_async::sync::Notify;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that counts fetches and can be held open until released.
    struct GatedSource {
        records: Vec<SourceTrack>,
        gate: Notify,
        hold: bool,
        fetches: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TrackSource for GatedSource {
        async fn fetch_tracks(&self) -> bridge_traits::error::Result<Vec<SourceTrack>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.hold {
                self.gate.notified().await;
            }
            Ok(self.records.clone())
        }
    }

    struct BrokenSource;

    #[async_trait::async_trait]
    impl TrackSource for BrokenSource {
        async fn fetch_tracks(&self) -> bridge_traits::error::Result<Vec<SourceTrack>> {
            Err(BridgeError::OperationFailed("disk on fire".to_string()))
        }
    }

    fn records() -> Vec<SourceTrack> {
        (1..=3)
            .map(|n| SourceTrack {
                title: format!("Song {n}"),
                genre: if n == 3 { "B" } else { "A" }.to_string(),
                source_uri: format!("file:///{n}.mp3"),
                ..Default::default()
            })
            .collect()
    }

    fn gated(hold: bool) -> Arc<GatedSource> {
        Arc::new(GatedSource {
            records: records(),
            gate: Notify::new(),
            hold,
            fetches: AtomicUsize::new(0),
        })
    }

    #[core_async::test]
    async fn test_reads_are_empty_before_first_load() {
        let catalog = MusicCatalog::new(gated(false), CatalogConfig::default()).unwrap();

        assert_eq!(catalog.state(), CatalogState::Uninitialized);
        assert!(catalog.genres().is_empty());
        assert!(catalog.search_by_title("").is_empty());
        assert_eq!(catalog.shuffled_tracks().count(), 0);
    }

    #[core_async::test]
    async fn test_refresh_reaches_ready() {
        let catalog = MusicCatalog::new(gated(false), CatalogConfig::default()).unwrap();

        assert_eq!(catalog.refresh().await.unwrap(), 3);
        assert!(catalog.is_ready());
        assert_eq!(catalog.generation(), 1);
        assert_eq!(catalog.genres(), vec!["A", "B"]);
    }

    #[core_async::test]
    async fn test_concurrent_refreshes_share_one_load() {
        let source = gated(true);
        let catalog = Arc::new(MusicCatalog::new(source.clone(), CatalogConfig::default()).unwrap());

        let first = catalog.refresh_in_background();
        while catalog.state() != CatalogState::Loading {
            task::yield_now().await;
        }
        let second = catalog.refresh_in_background();
        while catalog
            .lock_in_flight()
            .as_ref()
            .map_or(0, |signal| signal.waiter_count())
            == 0
        {
            task::yield_now().await;
        }

        source.gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), 3);
        assert_eq!(second.await.unwrap().unwrap(), 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.generation(), 1);
    }

    #[core_async::test]
    async fn test_first_failure_leaves_catalog_failed() {
        let catalog = MusicCatalog::new(Arc::new(BrokenSource), CatalogConfig::default()).unwrap();

        let err = catalog.refresh().await.unwrap_err();
        assert!(matches!(err, LibraryError::SourceLoadFailure(_)));
        assert_eq!(catalog.state(), CatalogState::Failed);
        assert!(catalog.genres().is_empty());
    }

    #[core_async::test]
    async fn test_cancelled_refresh_restores_state() {
        let source = gated(true);
        let catalog = MusicCatalog::new(source, CatalogConfig::default()).unwrap();

        let cancelled =
            core_async::time::timeout(core_async::Duration::from_millis(20), catalog.refresh()).await;
        assert!(cancelled.is_err());
        assert_eq!(catalog.state(), CatalogState::Uninitialized);
        assert!(catalog.lock_in_flight().is_none());
    }

    #[core_async::test]
    async fn test_cancelled_first_load_releases_waiters() {
        let catalog = Arc::new(MusicCatalog::new(gated(true), CatalogConfig::default()).unwrap());
        let waiter = {
            let catalog = Arc::clone(&catalog);
            task::spawn(async move { catalog.wait_until_ready().await })
        };
        task::yield_now().await;

        let cancelled =
            core_async::time::timeout(core_async::Duration::from_millis(20), catalog.refresh()).await;
        assert!(cancelled.is_err());

        let outcome = core_async::time::timeout(core_async::Duration::from_millis(200), waiter)
            .await
            .expect("waiter should be released by the cancellation")
            .unwrap();
        assert!(matches!(
            outcome,
            Err(LibraryError::SourceLoadFailure(ref msg)) if msg.contains("cancelled")
        ));
        assert_eq!(catalog.state(), CatalogState::Uninitialized);
        assert_eq!(catalog.generation(), 1);
    }

    #[core_async::test]
    async fn test_favorites_reset_and_artwork_survives_refresh() {
        let catalog = MusicCatalog::new(gated(false), CatalogConfig::default()).unwrap();
        catalog.refresh().await.unwrap();

        let id = catalog.genres().first().map(|g| catalog.tracks_by_genre(g)[0].id.clone()).unwrap();
        catalog.set_favorite(&id, true);
        catalog.update_artwork(&id, Some(Artwork::new(vec![1u8, 2])), None);
        assert_eq!(catalog.stats().favorite_count, 1);

        catalog.refresh().await.unwrap();
        assert!(!catalog.is_favorite(&id));
        assert!(catalog.artwork(&id).unwrap().album_art.is_some());
        assert_eq!(catalog.generation(), 2);
    }
}
