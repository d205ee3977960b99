//! Field-level diff for silent refetches.

use greenroom_core::DisplayTrack;

/// Identity of a row across refetches
fn same_row(a: &DisplayTrack, b: &DisplayTrack) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.is_same_track(&b.name, &b.artist) && a.played_at == b.played_at,
        _ => false,
    }
}

fn enrichment_changed(old: &DisplayTrack, new: &DisplayTrack) -> bool {
    old.album_art_url != new.album_art_url
        || old.metadata_status != new.metadata_status
        || old.has_preferred_artwork != new.has_preferred_artwork
}

/// Fold a refetched list into the current one.
///
/// When both lists hold the same rows in the same order, only rows whose
/// `album_art_url`, `metadata_status` or `has_preferred_artwork` changed are
/// replaced. Any other difference (new plays, removals) replaces the list.
/// Returns whether `current` was modified.
pub fn apply_enrichment_updates(current: &mut Vec<DisplayTrack>, fresh: Vec<DisplayTrack>) -> bool {
    let same_shape = current.len() == fresh.len()
        && current.iter().zip(&fresh).all(|(a, b)| same_row(a, b));

    if !same_shape {
        *current = fresh;
        return true;
    }

    let mut changed = false;
    for (slot, row) in current.iter_mut().zip(fresh) {
        if enrichment_changed(slot, &row) {
            *slot = row;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenroom_core::MetadataStatus;

    fn row(id: &str, status: MetadataStatus) -> DisplayTrack {
        DisplayTrack {
            id: Some(id.to_string()),
            metadata_status: status,
            ..DisplayTrack::new(format!("Song {}", id), "Artist")
        }
    }

    #[test]
    fn identical_lists_are_left_alone() {
        let mut current = vec![row("1", MetadataStatus::Pending), row("2", MetadataStatus::Enriched)];
        let fresh = current.clone();

        assert!(!apply_enrichment_updates(&mut current, fresh));
    }

    #[test]
    fn only_watched_fields_trigger_replacement() {
        let mut current = vec![row("1", MetadataStatus::Pending), row("2", MetadataStatus::Enriched)];

        // An album rename alone is not an enrichment change
        let mut fresh = current.clone();
        fresh[1].album = Some("Renamed".into());
        assert!(!apply_enrichment_updates(&mut current, fresh));
        assert_eq!(current[1].album, None);

        let mut fresh = current.clone();
        fresh[0].metadata_status = MetadataStatus::Enriched;
        fresh[0].album_art_url = Some("https://img.example/1.jpg".into());
        assert!(apply_enrichment_updates(&mut current, fresh));
        assert_eq!(current[0].metadata_status, MetadataStatus::Enriched);
        assert_eq!(current[0].album_art_url.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn preferred_artwork_flag_is_watched() {
        let mut current = vec![row("1", MetadataStatus::Enriched)];
        let mut fresh = current.clone();
        fresh[0].has_preferred_artwork = true;

        assert!(apply_enrichment_updates(&mut current, fresh));
        assert!(current[0].has_preferred_artwork);
    }

    #[test]
    fn new_rows_replace_the_list() {
        let mut current = vec![row("1", MetadataStatus::Pending)];
        let fresh = vec![row("2", MetadataStatus::Pending), row("1", MetadataStatus::Pending)];

        assert!(apply_enrichment_updates(&mut current, fresh));
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].id.as_deref(), Some("2"));
    }
}
