//! Recently-played list with enrichment polling.
//!
//! The server fills in artwork and metadata for new scrobbles a few seconds
//! after they arrive. While any row is still `pending` the feed refetches
//! silently on a fixed interval and folds in only the rows whose enrichment
//! changed. The polling task exits as soon as nothing is pending.

use crate::enrichment::apply_enrichment_updates;
use crate::merge::merge_now_playing;
use greenroom_core::{DisplayTrack, NowPlaying, RecentlyPlayedSource};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Interval between silent refetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

fn has_pending(tracks: &[DisplayTrack]) -> bool {
    tracks.iter().any(DisplayTrack::is_pending)
}

/// The recently-played feed and its enrichment poller
pub struct RecentlyPlayedFeed {
    source: Arc<dyn RecentlyPlayedSource>,
    limit: u32,
    interval: Duration,
    tracks: Arc<watch::Sender<Vec<DisplayTrack>>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl RecentlyPlayedFeed {
    pub fn new(source: Arc<dyn RecentlyPlayedSource>, limit: u32) -> Self {
        let (tracks, _) = watch::channel(Vec::new());
        Self {
            source,
            limit,
            interval: DEFAULT_POLL_INTERVAL,
            tracks: Arc::new(tracks),
            poller: Mutex::new(None),
        }
    }

    /// Override the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fetch the list, replacing what is held, and start polling if needed.
    ///
    /// A failed fetch degrades to an empty list.
    pub async fn refresh(&self) -> Vec<DisplayTrack> {
        let tracks = match self.source.recently_played(self.limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, "Failed to fetch recently played");
                Vec::new()
            }
        };

        debug!(count = tracks.len(), "Recently played refreshed");
        self.tracks.send_replace(tracks.clone());
        self.ensure_polling();
        tracks
    }

    /// Current list
    pub fn tracks(&self) -> Vec<DisplayTrack> {
        self.tracks.borrow().clone()
    }

    /// Current list with the now-playing track merged in
    pub fn merged(&self, now: Option<&NowPlaying>) -> Vec<DisplayTrack> {
        let tracks = self.tracks.borrow();
        merge_now_playing(now, &tracks).into_owned()
    }

    /// Notified whenever the list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<DisplayTrack>> {
        self.tracks.subscribe()
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Tear down the poller, if any
    pub fn stop_polling(&self) {
        if let Some(handle) = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
            debug!("Enrichment polling stopped");
        }
    }

    fn ensure_polling(&self) {
        let pending = has_pending(&self.tracks.borrow());
        if !pending {
            self.stop_polling();
            return;
        }

        let mut slot = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        debug!(interval_ms = self.interval.as_millis() as u64, "Starting enrichment polling");
        *slot = Some(tokio::spawn(poll_until_settled(
            Arc::clone(&self.source),
            self.limit,
            self.interval,
            Arc::clone(&self.tracks),
        )));
    }
}

impl Drop for RecentlyPlayedFeed {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

async fn poll_until_settled(
    source: Arc<dyn RecentlyPlayedSource>,
    limit: u32,
    interval: Duration,
    tracks: Arc<watch::Sender<Vec<DisplayTrack>>>,
) {
    loop {
        tokio::time::sleep(interval).await;

        match source.recently_played(limit).await {
            Ok(fresh) => {
                if tracks.send_if_modified(|current| apply_enrichment_updates(current, fresh)) {
                    debug!("Enrichment updates applied");
                }
            }
            // Silent refetch: keep showing what we have
            Err(e) => debug!(error = %e, "Enrichment refetch failed"),
        }

        let settled = !has_pending(&tracks.borrow());
        if settled {
            debug!("Nothing pending, enrichment polling finished");
            break;
        }
    }
}
