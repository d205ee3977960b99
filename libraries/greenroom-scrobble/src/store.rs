//! Scrobble store
//!
//! Owns the scrobbling toggle, the confirmed-scrobble history and the sync
//! of the device-local pending queue. Plays are batched to the API at most
//! 50 at a time; a failed batch stays queued for the next sync.

use crate::debounce::Debouncer;
use crate::optimistic;
use chrono::{DateTime, Utc};
use greenroom_core::{
    ConfirmedScrobble, GreenroomError, MetadataStatus, PendingPlay, PendingPlayQueue,
    RefreshArtworkResponse, RefreshArtworkStatus, Result, ScrobbleApi, ScrobbleSubmission,
    ScrobblingSignals, ScrobblingStatus,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Plays per `POST /api/v1/scrobbles`
pub const SYNC_BATCH_SIZE: usize = 50;
/// Plays read from the queue per sync
pub const MAX_SYNC_RECORDS: usize = 1000;
/// Quiet period before an automatic sync
pub const AUTO_SYNC_DELAY: Duration = Duration::from_millis(5000);
/// Scrobbles per history page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Snapshot of everything the scrobbling screens show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrobbleState {
    pub signals: ScrobblingSignals,
    /// Confirmed scrobbles, newest first
    pub scrobbles: Vec<ConfirmedScrobble>,
    pub next_cursor: Option<String>,
    pub pending_count: usize,
    pub syncing: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ScrobbleState {
    pub fn status(&self) -> ScrobblingStatus {
        self.signals.status()
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

struct Inner {
    api: Arc<dyn ScrobbleApi>,
    queue: Arc<dyn PendingPlayQueue>,
    syncing: AtomicBool,
    state: watch::Sender<ScrobbleState>,
    page_size: u32,
}

/// Clears the `syncing` flag however the sync exits
struct SyncGuard<'a> {
    inner: &'a Inner,
}

impl<'a> SyncGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        inner
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        inner.state.send_modify(|s| s.syncing = true);
        Some(Self { inner })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.inner.syncing.store(false, Ordering::Release);
        self.inner.state.send_modify(|s| s.syncing = false);
    }
}

impl Inner {
    async fn sync_now(&self) -> bool {
        if !self.api.has_session().await {
            debug!("No session, skipping scrobble sync");
            return false;
        }

        let Some(_guard) = SyncGuard::acquire(self) else {
            debug!("Scrobble sync already in progress");
            return false;
        };

        let plays = match self.queue.oldest(MAX_SYNC_RECORDS).await {
            Ok(plays) => plays,
            Err(e) => {
                warn!(error = %e, "Failed to read pending plays");
                return false;
            }
        };

        if plays.is_empty() {
            debug!("No pending plays to sync");
            return true;
        }

        info!(
            count = plays.len(),
            batches = plays.len().div_ceil(SYNC_BATCH_SIZE),
            "Syncing pending plays"
        );

        let mut synced = 0;
        for (index, batch) in plays.chunks(SYNC_BATCH_SIZE).enumerate() {
            if self.submit_batch(index, batch).await {
                synced += batch.len();
            }
        }

        if let Err(e) = self.refresh_pending_count().await {
            warn!(error = %e, "Failed to refresh pending count");
        }
        if synced > 0 {
            self.state
                .send_modify(|s| s.last_synced_at = Some(Utc::now()));
        }
        if let Err(e) = self.fetch_latest().await {
            warn!(error = %e, "Failed to fetch latest scrobbles after sync");
        }

        info!(synced, total = plays.len(), "Scrobble sync finished");
        synced > 0
    }

    /// Submit one batch and drop it from the queue if the server took it
    async fn submit_batch(&self, index: usize, batch: &[PendingPlay]) -> bool {
        let submissions: Vec<ScrobbleSubmission> =
            batch.iter().map(ScrobbleSubmission::from).collect();

        let ack = match self.api.submit_scrobbles(&submissions).await {
            Ok(ack) => ack,
            Err(e) => {
                warn!(
                    batch = index,
                    size = batch.len(),
                    error = %e,
                    "Scrobble batch failed, keeping it queued"
                );
                return false;
            }
        };

        debug!(
            batch = index,
            accepted = ack.accepted,
            rejected = ack.rejected,
            "Scrobble batch accepted"
        );

        let ids: Vec<String> = batch.iter().map(|p| p.local_id.clone()).collect();
        match self.queue.remove(&ids).await {
            Ok(removed) => {
                debug!(batch = index, removed, "Removed synced plays from queue");
                true
            }
            Err(e) => {
                // Submitted but still queued; the next sync sends it again
                warn!(batch = index, error = %e, "Failed to remove synced plays");
                false
            }
        }
    }

    async fn refresh_pending_count(&self) -> Result<usize> {
        let count = self.queue.count().await?;
        self.state.send_if_modified(|s| {
            let changed = s.pending_count != count;
            s.pending_count = count;
            changed
        });
        Ok(count)
    }

    async fn fetch_latest(&self) -> Result<()> {
        let page = self.api.list_scrobbles(None, self.page_size).await?;
        debug!(count = page.scrobbles.len(), "Fetched latest scrobbles");

        self.state.send_modify(|s| {
            s.scrobbles = page.scrobbles;
            s.next_cursor = page.next_cursor;
        });
        Ok(())
    }
}

/// Scrobbling service: toggle, history, offline queue and sync
pub struct ScrobbleStore {
    inner: Arc<Inner>,
    auto_sync: Debouncer,
}

impl ScrobbleStore {
    pub fn new(api: Arc<dyn ScrobbleApi>, queue: Arc<dyn PendingPlayQueue>) -> Self {
        Self::with_options(api, queue, AUTO_SYNC_DELAY, DEFAULT_PAGE_SIZE)
    }

    /// Override the auto-sync quiet period and the history page size
    pub fn with_options(
        api: Arc<dyn ScrobbleApi>,
        queue: Arc<dyn PendingPlayQueue>,
        auto_sync_delay: Duration,
        page_size: u32,
    ) -> Self {
        let (state, _) = watch::channel(ScrobbleState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                queue,
                syncing: AtomicBool::new(false),
                state,
                page_size,
            }),
            auto_sync: Debouncer::new(auto_sync_delay),
        }
    }

    pub fn state(&self) -> ScrobbleState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScrobbleState> {
        self.inner.state.subscribe()
    }

    // ---- status ----

    pub fn status(&self) -> ScrobblingStatus {
        self.inner.state.borrow().status()
    }

    pub fn signals(&self) -> ScrobblingSignals {
        self.inner.state.borrow().signals
    }

    /// Replace all signals, e.g. with persisted settings at startup
    pub fn restore_signals(&self, signals: ScrobblingSignals) {
        self.inner.state.send_modify(|s| s.signals = signals);
    }

    /// The user's toggle. Returns the new status.
    pub fn set_enabled(&self, enabled: bool) -> ScrobblingStatus {
        self.inner.state.send_modify(|s| s.signals.set_enabled(enabled));
        let status = self.status();
        info!(enabled, status = %status, "Scrobbling toggled");
        status
    }

    /// Report whether the OS lets us observe playback. Returns the new status.
    pub fn set_permission_granted(&self, granted: bool) -> ScrobblingStatus {
        self.inner
            .state
            .send_modify(|s| s.signals.permission_granted = granted);
        self.status()
    }

    // ---- sync ----

    pub fn is_syncing(&self) -> bool {
        self.inner.syncing.load(Ordering::Acquire)
    }

    /// Submit every pending play now.
    ///
    /// Returns `true` if at least one play reached the server or there was
    /// nothing to send. Never fails; problems are logged. A call made while
    /// another sync is running returns `false` without doing anything.
    pub async fn sync_now(&self) -> bool {
        self.inner.sync_now().await
    }

    /// Sync once plays stop arriving for a few seconds.
    ///
    /// Only fires while scrobbling is active and no sync is running.
    pub fn auto_sync(&self) {
        let inner = Arc::clone(&self.inner);
        self.auto_sync.call(move || async move {
            let status = inner.state.borrow().status();
            if status != ScrobblingStatus::Active {
                debug!(status = %status, "Auto-sync skipped, scrobbling not active");
                return;
            }
            if inner.syncing.load(Ordering::Acquire) {
                debug!("Auto-sync skipped, sync already running");
                return;
            }
            inner.sync_now().await;
        });
    }

    /// Whether an auto-sync is waiting to fire
    pub fn auto_sync_pending(&self) -> bool {
        self.auto_sync.is_pending()
    }

    /// Queue a captured play and schedule an auto-sync.
    pub async fn record_play(&self, play: &PendingPlay) -> Result<usize> {
        if play.track_name.trim().is_empty() || play.artist_name.trim().is_empty() {
            return Err(GreenroomError::invalid_input(
                "a play needs a track name and an artist name",
            ));
        }

        self.inner.queue.enqueue(play).await?;
        let count = self.inner.refresh_pending_count().await?;
        debug!(local_id = %play.local_id, pending = count, "Recorded play");

        self.auto_sync();
        Ok(count)
    }

    pub async fn refresh_pending_count(&self) -> Result<usize> {
        self.inner.refresh_pending_count().await
    }

    // ---- history ----

    /// Replace the history with the newest page.
    pub async fn fetch_latest(&self) -> Result<()> {
        self.inner.fetch_latest().await
    }

    /// Append the next page. Returns `false` when there is nothing more.
    pub async fn load_more(&self) -> Result<bool> {
        let Some(cursor) = self.inner.state.borrow().next_cursor.clone() else {
            return Ok(false);
        };

        let page = self
            .inner
            .api
            .list_scrobbles(Some(cursor.clone()), self.inner.page_size)
            .await?;
        debug!(count = page.scrobbles.len(), "Loaded more scrobbles");

        self.inner.state.send_modify(|s| {
            // A refresh may have replaced the list meanwhile
            if s.next_cursor.as_deref() != Some(cursor.as_str()) {
                return;
            }
            for scrobble in page.scrobbles {
                if !s.scrobbles.iter().any(|known| known.id == scrobble.id) {
                    s.scrobbles.push(scrobble);
                }
            }
            s.next_cursor = page.next_cursor;
        });
        Ok(true)
    }

    // ---- artwork ----

    /// Ask the server to look for artwork again and apply what it found.
    pub async fn refresh_artwork(&self, scrobble_id: &str) -> Result<RefreshArtworkResponse> {
        let response = self.inner.api.refresh_artwork(scrobble_id).await?;
        debug!(scrobble_id, status = ?response.status, "Artwork refresh answered");

        if response.status == RefreshArtworkStatus::Success {
            if let Some(url) = response.album_art_url.clone() {
                self.inner.state.send_if_modified(|s| {
                    let Some(scrobble) = s.scrobbles.iter_mut().find(|x| x.id == scrobble_id) else {
                        return false;
                    };
                    scrobble.album_art_url = Some(url);
                    scrobble.metadata_status = MetadataStatus::Enriched;
                    true
                });
            }
        }

        Ok(response)
    }

    /// Pin an artwork URL, showing it immediately.
    pub async fn set_preferred_artwork(&self, scrobble_id: &str, artwork_url: &str) -> Result<()> {
        let inner = &self.inner;
        optimistic::apply(
            &inner.state,
            |s| {
                let scrobble = s.scrobbles.iter_mut().find(|x| x.id == scrobble_id)?;
                let undo = (scrobble.album_art_url.clone(), scrobble.has_preferred_artwork);
                scrobble.album_art_url = Some(artwork_url.to_string());
                scrobble.has_preferred_artwork = true;
                Some(undo)
            },
            inner.api.set_preferred_artwork(scrobble_id, artwork_url),
            |s, (url, pinned)| restore_artwork(s, scrobble_id, url, pinned),
        )
        .await
        .map_err(|e| {
            warn!(scrobble_id, error = %e, "Setting preferred artwork failed, reverted");
            e
        })
    }

    /// Unpin the artwork, showing the change immediately.
    pub async fn clear_preferred_artwork(&self, scrobble_id: &str) -> Result<()> {
        let inner = &self.inner;
        optimistic::apply(
            &inner.state,
            |s| {
                let scrobble = s
                    .scrobbles
                    .iter_mut()
                    .find(|x| x.id == scrobble_id && x.has_preferred_artwork)?;
                scrobble.has_preferred_artwork = false;
                Some(scrobble.album_art_url.clone())
            },
            inner.api.clear_preferred_artwork(scrobble_id),
            |s, url| restore_artwork(s, scrobble_id, url, true),
        )
        .await
        .map_err(|e| {
            warn!(scrobble_id, error = %e, "Clearing preferred artwork failed, reverted");
            e
        })
    }

    /// Forget the signed-in user's history and any scheduled sync.
    ///
    /// The pending queue and the toggle belong to the device and are kept.
    pub fn reset(&self) {
        self.auto_sync.cancel();
        self.inner.state.send_modify(|s| {
            s.scrobbles.clear();
            s.next_cursor = None;
            s.last_synced_at = None;
        });
        debug!("Scrobble store reset");
    }
}

fn restore_artwork(state: &mut ScrobbleState, scrobble_id: &str, url: Option<String>, pinned: bool) {
    if let Some(scrobble) = state.scrobbles.iter_mut().find(|x| x.id == scrobble_id) {
        scrobble.album_art_url = url;
        scrobble.has_preferred_artwork = pinned;
    }
}
