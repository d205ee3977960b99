/// Live playback signal from the device
use super::non_blank;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

/// What the device is playing right now
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    /// Artwork URI supplied by the player
    pub artwork_uri: Option<String>,
    /// Artwork bytes embedded in the media session
    pub artwork_data: Option<Vec<u8>>,
    pub source_app: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl NowPlaying {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            ..Self::default()
        }
    }

    /// Artwork the live signal provides, URI first, then embedded bytes as a `data:` URI
    pub fn live_artwork(&self) -> Option<String> {
        if let Some(uri) = non_blank(self.artwork_uri.as_deref()) {
            return Some(uri.to_string());
        }

        let data = self.artwork_data.as_deref().filter(|d| !d.is_empty())?;
        let mime = if data.starts_with(PNG_SIGNATURE) {
            "image/png"
        } else {
            "image/jpeg"
        };
        Some(format!("data:{};base64,{}", mime, STANDARD.encode(data)))
    }
}
