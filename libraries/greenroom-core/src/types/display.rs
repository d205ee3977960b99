/// Feed view-model
use super::scrobble::{ConfirmedScrobble, MetadataStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the recently-played feed
///
/// Built either from the server's recently-played list or from the live
/// now-playing signal. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayTrack {
    /// Scrobble ID, absent for rows that only exist on the device
    #[serde(default, deserialize_with = "super::id::optional_string_or_number")]
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_art_url: Option<String>,
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata_status: MetadataStatus,
    #[serde(default)]
    pub has_preferred_artwork: bool,
    #[serde(default)]
    pub now_playing: bool,
    /// Where the server got this row from (`scrobble`, `lastfm`)
    #[serde(default)]
    pub source: Option<String>,
}

impl DisplayTrack {
    /// Create a row with just a name and artist
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive `(name, artist)` equality
    pub fn is_same_track(&self, name: &str, artist: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && self.artist.to_lowercase() == artist.to_lowercase()
    }

    /// Whether the server is still enriching this row
    pub fn is_pending(&self) -> bool {
        self.metadata_status.is_pending()
    }
}

impl From<&ConfirmedScrobble> for DisplayTrack {
    fn from(scrobble: &ConfirmedScrobble) -> Self {
        Self {
            id: Some(scrobble.id.clone()),
            name: scrobble.track_name.clone(),
            artist: scrobble.artist_name.clone(),
            album: scrobble.album_name.clone(),
            album_art_url: scrobble.album_art_url.clone(),
            played_at: Some(scrobble.played_at),
            metadata_status: scrobble.metadata_status,
            has_preferred_artwork: scrobble.has_preferred_artwork,
            now_playing: false,
            source: Some("scrobble".to_string()),
        }
    }
}
