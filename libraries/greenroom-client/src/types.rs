//! Types for Greenroom API requests and responses.

use greenroom_core::{DisplayTrack, Role, ScrobbleSubmission, User};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to the Greenroom API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.greenroom.fm")
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserPayload,
}

/// Request body for token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response from token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    /// Absent when the server does not rotate refresh tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// User as the API sends it.
///
/// Older accounts carry their role in `user_type` instead of `role`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    #[serde(deserialize_with = "greenroom_core::types::id::string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl UserPayload {
    /// `role` wins; the legacy `user_type` is used only when `role` is blank or missing
    pub fn normalized_role(&self) -> Role {
        [self.role.as_deref(), self.user_type.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(Role::parse_lenient)
            .unwrap_or_default()
    }
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        let role = payload.normalized_role();
        User {
            id: payload.id,
            username: payload.username,
            email: payload.email,
            display_name: payload.display_name,
            role,
        }
    }
}

// =============================================================================
// Scrobble Types
// =============================================================================

/// Request body for `POST /api/v1/scrobbles`.
#[derive(Debug, Serialize)]
pub struct SubmitScrobblesRequest<'a> {
    pub scrobbles: &'a [ScrobbleSubmission],
}

/// Request body for setting preferred artwork.
#[derive(Debug, Serialize)]
pub struct SetArtworkRequest<'a> {
    pub preferred_artwork_url: &'a str,
}

/// `GET /recently-played` answers with either a bare list or `{ tracks: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecentlyPlayedResponse {
    Wrapped { tracks: Vec<DisplayTrack> },
    Bare(Vec<DisplayTrack>),
}

impl RecentlyPlayedResponse {
    pub fn into_tracks(self) -> Vec<DisplayTrack> {
        match self {
            RecentlyPlayedResponse::Wrapped { tracks } | RecentlyPlayedResponse::Bare(tracks) => {
                tracks
            }
        }
    }
}
