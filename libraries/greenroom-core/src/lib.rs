//! Greenroom Core
//!
//! Platform-agnostic domain types, seam traits, and error handling shared by
//! every Greenroom client crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `PendingPlay`, `ConfirmedScrobble`, `DisplayTrack`,
//!   `NowPlaying`, `TrackLinks`, `User`
//! - **Core Traits**: `ScrobbleApi`, `RecentlyPlayedSource`, `PendingPlayQueue`
//! - **Error Handling**: Unified `GreenroomError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use greenroom_core::types::{PendingPlay, ScrobbleSubmission};
//! use chrono::Utc;
//!
//! let play = PendingPlay::new("Harvest Moon", "Neil Young", 5_000, "com.spotify.music", Utc::now());
//! let submission = ScrobbleSubmission::from(&play);
//!
//! // Short plays are raised to the server's minimum duration
//! assert_eq!(submission.duration_ms, 30_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory_queue;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{GreenroomError, Result};
pub use memory_queue::MemoryPendingQueue;
pub use traits::{PendingPlayQueue, RecentlyPlayedSource, ScrobbleApi};

#[cfg(any(test, feature = "testing"))]
pub use traits::{MockPendingPlayQueue, MockRecentlyPlayedSource, MockScrobbleApi};

pub use types::{
    // Offline queue
    ExtendedMetadata, PendingPlay, ScrobbleSubmission, MIN_SUBMITTED_DURATION_MS,
    // Server records
    ConfirmedScrobble, MetadataStatus, RefreshArtworkResponse, RefreshArtworkStatus,
    ScrobblePage, SubmitScrobblesResponse,
    // Scrobbling toggle
    ScrobblingSignals, ScrobblingStatus,
    // Feed
    DisplayTrack, NowPlaying,
    // Links
    BandLinks, Platform, PlatformLink, PlatformLinks, TrackLinks,
    // Accounts
    Role, User,
};
