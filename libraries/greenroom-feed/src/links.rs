//! Streaming link resolution
//!
//! A review card has one play button. Which URL it opens is decided by a
//! fixed priority chain over the track's and the band's links; the first
//! source that is present wins:
//!
//! | # | Source | Action | Kind |
//! |---|---|---|---|
//! | 1 | `preferred_track_link` | open | direct |
//! | 2 | track link on the user's preferred platform | open | direct |
//! | 3 | the only track platform link | open | direct |
//! | 4 | several track platform links | choose | direct |
//! | 5 | `songlink_url` | open | direct |
//! | 6 | `preferred_band_link` | open | indirect |
//! | 7 | the only band platform link | open | indirect |
//! | 8 | several band platform links | choose | indirect |
//! | 9 | `songlink_search_url` | open | indirect |
//! | 10 | legacy `song_link` | open | indirect |
//!
//! With none of these there is no play affordance.

use greenroom_core::{BandLinks, Platform, PlatformLink, TrackLinks};

/// Whether the link leads to the track itself or only somewhere near it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The track on a streaming service (or a deep link to it)
    Direct,
    /// The band's page or a search
    Indirect,
}

/// What pressing play should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayAction {
    /// Open this URL
    Open { url: String, kind: LinkKind },
    /// Let the user pick a platform
    Choose { links: Vec<PlatformLink>, kind: LinkKind },
    /// No affordance
    None,
}

impl PlayAction {
    pub fn kind(&self) -> Option<LinkKind> {
        match self {
            PlayAction::Open { kind, .. } | PlayAction::Choose { kind, .. } => Some(*kind),
            PlayAction::None => None,
        }
    }
}

fn open(url: &str, kind: LinkKind) -> PlayAction {
    PlayAction::Open {
        url: url.to_string(),
        kind,
    }
}

/// Run the priority chain.
pub fn resolve(track: &TrackLinks, band: &BandLinks, preferred: Option<Platform>) -> PlayAction {
    use LinkKind::{Direct, Indirect};

    if let Some(url) = track.preferred_link() {
        return open(url, Direct);
    }

    if let Some(url) = preferred.and_then(|p| track.platforms.get(p)) {
        return open(url, Direct);
    }

    let mut track_links = track.platforms.available();
    match track_links.len() {
        0 => {}
        1 => return open(&track_links.remove(0).url, Direct),
        _ => {
            return PlayAction::Choose {
                links: track_links,
                kind: Direct,
            }
        }
    }

    if let Some(url) = track.songlink() {
        return open(url, Direct);
    }

    if let Some(url) = band.preferred_link() {
        return open(url, Indirect);
    }

    let mut band_links = band.platforms.available();
    match band_links.len() {
        0 => {}
        1 => return open(&band_links.remove(0).url, Indirect),
        _ => {
            return PlayAction::Choose {
                links: band_links,
                kind: Indirect,
            }
        }
    }

    track
        .songlink_search()
        .or_else(|| track.legacy_link())
        .map_or(PlayAction::None, |url| open(url, Indirect))
}

/// Direct or indirect, or `None` when there is nothing to open.
pub fn classify(track: &TrackLinks, band: &BandLinks, preferred: Option<Platform>) -> Option<LinkKind> {
    resolve(track, band, preferred).kind()
}

/// The URL the play button points at; for a choice, the first option.
pub fn best_url(track: &TrackLinks, band: &BandLinks, preferred: Option<Platform>) -> Option<String> {
    match resolve(track, band, preferred) {
        PlayAction::Open { url, .. } => Some(url),
        PlayAction::Choose { links, .. } => links.into_iter().next().map(|link| link.url),
        PlayAction::None => None,
    }
}
