//! Greenroom Feed
//!
//! Everything the recently-played feed needs besides the HTTP call itself:
//!
//! - [`merge_now_playing`]: fold the device's live now-playing signal into
//!   the server's recently-played list
//! - [`apply_enrichment_updates`]: field-level diff of a silent refetch
//! - [`RecentlyPlayedFeed`]: holds the list and polls while enrichment is pending
//! - [`links`]: pick which external streaming link a track's play button opens

mod enrichment;
pub mod links;
mod merge;
mod poller;

pub use enrichment::apply_enrichment_updates;
pub use links::{best_url, classify, resolve, LinkKind, PlayAction};
pub use merge::merge_now_playing;
pub use poller::{RecentlyPlayedFeed, DEFAULT_POLL_INTERVAL};
