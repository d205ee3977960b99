//! Greenroom API Client
//!
//! HTTP client library for the Greenroom REST API.
//!
//! # Features
//!
//! - **Authentication**: Login, token refresh on `token_expired` (once per request), logout
//! - **Session store**: Single owner of tokens and the signed-in user, with change notifications
//! - **Scrobbles**: Batch submission, cursor pagination, artwork refresh and pinning
//! - **Recently played**: The server-merged feed of scrobbles and Last.fm plays
//!
//! # Example
//!
//! ```ignore
//! use greenroom_client::{ClientConfig, GreenroomClient, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SessionStore::new());
//!     let client = GreenroomClient::new(ClientConfig::new("https://api.greenroom.fm"), session)?;
//!
//!     let user = client.login("kim@example.com", "hunter2").await?;
//!     println!("Logged in as {}", user.username);
//!
//!     let recent = client.recently_played(20).await?;
//!     println!("{} recent tracks", recent.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod scrobbles;
mod session;
mod types;

// Re-export main types
pub use client::GreenroomClient;
pub use error::{ApiClientError, ErrorDetails, Result, GENERIC_ERROR_MESSAGE};
pub use scrobbles::MAX_SCROBBLE_BATCH;
pub use session::{Session, SessionStore};
pub use types::{
    ClientConfig, LoginResponse, RecentlyPlayedResponse, RefreshTokenResponse, UserPayload,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
