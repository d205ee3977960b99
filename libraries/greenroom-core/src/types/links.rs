/// External streaming link types
use super::non_blank;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Streaming platforms a track or band can link to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Spotify,
    AppleMusic,
    YoutubeMusic,
    Youtube,
    Tidal,
    Deezer,
    AmazonMusic,
    Soundcloud,
    Bandcamp,
}

impl Platform {
    /// All platforms in display order
    pub const ALL: [Platform; 9] = [
        Platform::Spotify,
        Platform::AppleMusic,
        Platform::YoutubeMusic,
        Platform::Youtube,
        Platform::Tidal,
        Platform::Deezer,
        Platform::AmazonMusic,
        Platform::Soundcloud,
        Platform::Bandcamp,
    ];

    /// Wire/config key
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::AppleMusic => "apple_music",
            Platform::YoutubeMusic => "youtube_music",
            Platform::Youtube => "youtube",
            Platform::Tidal => "tidal",
            Platform::Deezer => "deezer",
            Platform::AmazonMusic => "amazon_music",
            Platform::Soundcloud => "soundcloud",
            Platform::Bandcamp => "bandcamp",
        }
    }

    /// Human-readable name for menus
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::AppleMusic => "Apple Music",
            Platform::YoutubeMusic => "YouTube Music",
            Platform::Youtube => "YouTube",
            Platform::Tidal => "Tidal",
            Platform::Deezer => "Deezer",
            Platform::AmazonMusic => "Amazon Music",
            Platform::Soundcloud => "SoundCloud",
            Platform::Bandcamp => "Bandcamp",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| format!("unknown streaming platform: {}", s))
    }
}

/// A resolved link to one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformLink {
    pub platform: Platform,
    pub url: String,
}

/// One optional URL per platform, as the API sends them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformLinks {
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub apple_music_url: Option<String>,
    #[serde(default)]
    pub youtube_music_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub tidal_url: Option<String>,
    #[serde(default)]
    pub deezer_url: Option<String>,
    #[serde(default)]
    pub amazon_music_url: Option<String>,
    #[serde(default)]
    pub soundcloud_url: Option<String>,
    #[serde(default)]
    pub bandcamp_url: Option<String>,
}

impl PlatformLinks {
    fn slot(&self, platform: Platform) -> &Option<String> {
        match platform {
            Platform::Spotify => &self.spotify_url,
            Platform::AppleMusic => &self.apple_music_url,
            Platform::YoutubeMusic => &self.youtube_music_url,
            Platform::Youtube => &self.youtube_url,
            Platform::Tidal => &self.tidal_url,
            Platform::Deezer => &self.deezer_url,
            Platform::AmazonMusic => &self.amazon_music_url,
            Platform::Soundcloud => &self.soundcloud_url,
            Platform::Bandcamp => &self.bandcamp_url,
        }
    }

    fn slot_mut(&mut self, platform: Platform) -> &mut Option<String> {
        match platform {
            Platform::Spotify => &mut self.spotify_url,
            Platform::AppleMusic => &mut self.apple_music_url,
            Platform::YoutubeMusic => &mut self.youtube_music_url,
            Platform::Youtube => &mut self.youtube_url,
            Platform::Tidal => &mut self.tidal_url,
            Platform::Deezer => &mut self.deezer_url,
            Platform::AmazonMusic => &mut self.amazon_music_url,
            Platform::Soundcloud => &mut self.soundcloud_url,
            Platform::Bandcamp => &mut self.bandcamp_url,
        }
    }

    /// URL for a platform, ignoring blank values
    pub fn get(&self, platform: Platform) -> Option<&str> {
        non_blank(self.slot(platform).as_deref())
    }

    /// Set the URL for a platform
    pub fn set(&mut self, platform: Platform, url: impl Into<String>) {
        *self.slot_mut(platform) = Some(url.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, platform: Platform, url: impl Into<String>) -> Self {
        self.set(platform, url);
        self
    }

    /// Every present link, in `Platform::ALL` order
    pub fn available(&self) -> Vec<PlatformLink> {
        Platform::ALL
            .into_iter()
            .filter_map(|platform| {
                self.get(platform).map(|url| PlatformLink {
                    platform,
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

/// Links attached to a track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLinks {
    /// Curator-set override
    #[serde(default)]
    pub preferred_track_link: Option<String>,
    /// Aggregator deep link
    #[serde(default)]
    pub songlink_url: Option<String>,
    /// Aggregator search fallback
    #[serde(default)]
    pub songlink_search_url: Option<String>,
    /// Legacy single link field
    #[serde(default)]
    pub song_link: Option<String>,
    #[serde(flatten)]
    pub platforms: PlatformLinks,
}

/// Links attached to a band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandLinks {
    #[serde(default)]
    pub preferred_band_link: Option<String>,
    #[serde(flatten)]
    pub platforms: PlatformLinks,
}

impl TrackLinks {
    /// Curator override, if not blank
    pub fn preferred_link(&self) -> Option<&str> {
        non_blank(self.preferred_track_link.as_deref())
    }

    /// Aggregator deep link, if not blank
    pub fn songlink(&self) -> Option<&str> {
        non_blank(self.songlink_url.as_deref())
    }

    /// Aggregator search, if not blank
    pub fn songlink_search(&self) -> Option<&str> {
        non_blank(self.songlink_search_url.as_deref())
    }

    pub fn legacy_link(&self) -> Option<&str> {
        non_blank(self.song_link.as_deref())
    }
}

impl BandLinks {
    /// Curator override for the band, if not blank
    pub fn preferred_link(&self) -> Option<&str> {
        non_blank(self.preferred_band_link.as_deref())
    }
}
