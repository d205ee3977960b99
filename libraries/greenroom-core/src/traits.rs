/// Core traits for Greenroom
///
/// These are the seams between the stores and their I/O: the REST API on one
/// side, the device-local pending-play queue on the other.
use crate::error::Result;
use crate::types::{
    DisplayTrack, PendingPlay, RefreshArtworkResponse, ScrobblePage, ScrobbleSubmission,
    SubmitScrobblesResponse,
};
use async_trait::async_trait;

/// Scrobble endpoints of the Greenroom API
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ScrobbleApi: Send + Sync {
    /// Whether a session token is currently held
    async fn has_session(&self) -> bool;

    /// Submit one batch (at most 50 entries)
    async fn submit_scrobbles(&self, batch: &[ScrobbleSubmission]) -> Result<SubmitScrobblesResponse>;

    /// Fetch one page of confirmed scrobbles, newest first
    async fn list_scrobbles(&self, cursor: Option<String>, limit: u32) -> Result<ScrobblePage>;

    /// Ask the server to look for artwork again
    async fn refresh_artwork(&self, scrobble_id: &str) -> Result<RefreshArtworkResponse>;

    /// Pin an artwork URL on a scrobble
    async fn set_preferred_artwork(&self, scrobble_id: &str, artwork_url: &str) -> Result<()>;

    /// Remove a pinned artwork URL
    async fn clear_preferred_artwork(&self, scrobble_id: &str) -> Result<()>;
}

/// Source of the server-merged recently-played list
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RecentlyPlayedSource: Send + Sync {
    /// Fetch the newest `limit` rows
    async fn recently_played(&self, limit: u32) -> Result<Vec<DisplayTrack>>;
}

/// Device-local queue of plays waiting for submission
///
/// Implementations must return `oldest` in a deterministic order:
/// `played_at` ascending, ties broken by `local_id`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PendingPlayQueue: Send + Sync {
    /// Add a play; re-adding an existing `local_id` is a no-op
    async fn enqueue(&self, play: &PendingPlay) -> Result<()>;

    /// Up to `limit` plays, oldest first
    async fn oldest(&self, limit: usize) -> Result<Vec<PendingPlay>>;

    /// Remove acknowledged plays, returning how many were removed
    async fn remove(&self, local_ids: &[String]) -> Result<usize>;

    /// Number of queued plays
    async fn count(&self) -> Result<usize>;

    /// Drop every queued play
    async fn clear(&self) -> Result<()>;
}
