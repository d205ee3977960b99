//! Now-playing / recently-played merge.

use greenroom_core::{DisplayTrack, MetadataStatus, NowPlaying};
use std::borrow::Cow;

/// Put the live now-playing track at the head of the recently-played list.
///
/// Without a now-playing signal the input is returned borrowed and untouched.
/// Otherwise the first recent entry with the same name and artist (compared
/// case-insensitively) is treated as the same play: it is removed from the
/// list and its id, timestamp, album, artwork and status fill in whatever the
/// live signal lacks. Live artwork always wins and marks the entry enriched.
pub fn merge_now_playing<'a>(
    now: Option<&NowPlaying>,
    recent: &'a [DisplayTrack],
) -> Cow<'a, [DisplayTrack]> {
    let Some(now) = now else {
        return Cow::Borrowed(recent);
    };

    let matched = recent
        .iter()
        .position(|track| track.is_same_track(&now.track_name, &now.artist_name));
    let previous = matched.map(|i| &recent[i]);

    let live_artwork = now.live_artwork();
    let metadata_status = if live_artwork.is_some() {
        MetadataStatus::Enriched
    } else {
        previous.map_or(MetadataStatus::Pending, |p| p.metadata_status)
    };

    let entry = DisplayTrack {
        id: previous.and_then(|p| p.id.clone()),
        name: now.track_name.clone(),
        artist: now.artist_name.clone(),
        album: now
            .album_name
            .clone()
            .or_else(|| previous.and_then(|p| p.album.clone())),
        album_art_url: live_artwork.or_else(|| previous.and_then(|p| p.album_art_url.clone())),
        played_at: previous.and_then(|p| p.played_at).or(now.started_at),
        metadata_status,
        has_preferred_artwork: previous.is_some_and(|p| p.has_preferred_artwork),
        now_playing: true,
        source: previous.and_then(|p| p.source.clone()),
    };

    let mut merged = Vec::with_capacity(recent.len() + 1);
    merged.push(entry);
    merged.extend(
        recent
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != matched)
            .map(|(_, track)| track.clone()),
    );

    Cow::Owned(merged)
}
