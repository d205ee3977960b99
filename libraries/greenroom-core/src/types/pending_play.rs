/// Offline play queue types
use super::non_blank;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side minimum play duration; shorter plays are raised to this value
pub const MIN_SUBMITTED_DURATION_MS: u64 = 30_000;

/// A play recorded on this device that the server has not acknowledged yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPlay {
    /// Device-local identifier (UUID v4)
    pub local_id: String,

    /// Track title as reported by the capturing app
    pub track_name: String,

    /// Artist name as reported by the capturing app
    pub artist_name: String,

    /// Album name
    pub album_name: Option<String>,

    /// Reported play length in milliseconds
    pub duration_ms: u64,

    /// Identifier of the app that produced the play
    pub source_app: String,

    /// When playback started
    pub played_at: DateTime<Utc>,

    /// Optional tags the capturing app could read
    #[serde(default)]
    pub extended_metadata: ExtendedMetadata,
}

/// Optional tags attached to a pending play
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedMetadata {
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub release_date: Option<String>,
    pub artwork_url: Option<String>,
    pub isrc: Option<String>,
}

impl PendingPlay {
    /// Create a pending play with a fresh local ID
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        duration_ms: u64,
        source_app: impl Into<String>,
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            local_id: Uuid::new_v4().to_string(),
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            album_name: None,
            duration_ms,
            source_app: source_app.into(),
            played_at,
            extended_metadata: ExtendedMetadata::default(),
        }
    }

    /// Set the album name
    pub fn with_album(mut self, album_name: impl Into<String>) -> Self {
        self.album_name = Some(album_name.into());
        self
    }

    /// Attach extended metadata
    pub fn with_metadata(mut self, metadata: ExtendedMetadata) -> Self {
        self.extended_metadata = metadata;
        self
    }
}

/// One entry of a `POST /api/v1/scrobbles` batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrobbleSubmission {
    pub track_name: String,
    pub artist_name: String,
    /// RFC 3339 timestamp
    pub played_at: String,
    pub duration_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
}

impl From<&PendingPlay> for ScrobbleSubmission {
    fn from(play: &PendingPlay) -> Self {
        let meta = &play.extended_metadata;
        let owned = |v: Option<&String>| non_blank(v.map(String::as_str)).map(str::to_string);

        Self {
            track_name: play.track_name.clone(),
            artist_name: play.artist_name.clone(),
            played_at: play.played_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_ms: play.duration_ms.max(MIN_SUBMITTED_DURATION_MS),
            album_name: owned(play.album_name.as_ref()),
            source_device: owned(Some(&play.source_app)),
            album_artist: owned(meta.album_artist.as_ref()),
            genre: owned(meta.genre.as_ref()),
            year: meta.year.filter(|y| *y > 0),
            release_date: owned(meta.release_date.as_ref()),
            artwork_url: owned(meta.artwork_url.as_ref()),
            isrc: owned(meta.isrc.as_ref()),
        }
    }
}
