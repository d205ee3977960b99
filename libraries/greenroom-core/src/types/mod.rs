mod display;
pub mod id;
mod links;
mod now_playing;
mod pending_play;
mod scrobble;
mod status;
mod user;

pub use display::DisplayTrack;
pub use links::{BandLinks, Platform, PlatformLink, PlatformLinks, TrackLinks};
pub use now_playing::NowPlaying;
pub use pending_play::{ExtendedMetadata, PendingPlay, ScrobbleSubmission, MIN_SUBMITTED_DURATION_MS};
pub use scrobble::{
    ConfirmedScrobble, MetadataStatus, RefreshArtworkResponse, RefreshArtworkStatus,
    ScrobblePage, SubmitScrobblesResponse,
};
pub use status::{ScrobblingSignals, ScrobblingStatus};
pub use user::{Role, User};

/// Trim an optional string, treating blank values as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
