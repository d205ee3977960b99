//! Greenroom Scrobble
//!
//! The scrobble store: offline play queue reconciliation, the scrobbling
//! toggle state machine, confirmed-scrobble history and artwork actions.
//!
//! # Example
//!
//! ```ignore
//! use greenroom_scrobble::ScrobbleStore;
//! use std::sync::Arc;
//!
//! let store = ScrobbleStore::new(Arc::new(client), Arc::new(queue));
//! store.set_permission_granted(true);
//! store.set_enabled(true);
//!
//! store.record_play(&play).await?;   // schedules an auto-sync
//! let synced = store.sync_now().await;
//! ```

mod debounce;
pub mod optimistic;
mod store;

pub use debounce::Debouncer;
pub use store::{
    ScrobbleState, ScrobbleStore, AUTO_SYNC_DELAY, DEFAULT_PAGE_SIZE, MAX_SYNC_RECORDS,
    SYNC_BATCH_SIZE,
};
