/// Server-confirmed scrobble types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enrichment lifecycle of a scrobble's artwork and metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataStatus {
    /// Waiting for the server-side enrichment job
    #[default]
    Pending,
    /// Artwork and metadata were found
    Enriched,
    /// Enrichment finished without a match
    NotFound,
    /// Enrichment gave up after an error
    Failed,
}

impl MetadataStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataStatus::Pending => "pending",
            MetadataStatus::Enriched => "enriched",
            MetadataStatus::NotFound => "not_found",
            MetadataStatus::Failed => "failed",
        }
    }

    /// Whether the server will still change this status
    pub fn is_pending(&self) -> bool {
        matches!(self, MetadataStatus::Pending)
    }
}

impl fmt::Display for MetadataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A play the server has accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedScrobble {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    pub played_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub metadata_status: MetadataStatus,
    #[serde(default)]
    pub album_art_url: Option<String>,
    #[serde(default)]
    pub has_preferred_artwork: bool,
    #[serde(default)]
    pub can_refresh_artwork: bool,
}

/// One page of `GET /api/v1/scrobbles`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrobblePage {
    #[serde(default)]
    pub scrobbles: Vec<ConfirmedScrobble>,
    /// Cursor for the next page, absent on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Acknowledgement of a submitted batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitScrobblesResponse {
    #[serde(default)]
    pub accepted: usize,
    #[serde(default)]
    pub rejected: usize,
}

/// Outcome reported by `POST /api/v1/scrobbles/:id/refresh_artwork`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshArtworkStatus {
    Success,
    NotFound,
    AlreadyHasArtwork,
    NoTrack,
}

/// Response body of an artwork refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshArtworkResponse {
    pub status: RefreshArtworkStatus,
    #[serde(default)]
    pub album_art_url: Option<String>,
}
