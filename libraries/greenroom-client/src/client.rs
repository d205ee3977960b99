//! Main Greenroom API client.

use crate::auth::AuthClient;
use crate::error::{error_from_response, map_send_error, read_error_details, ApiClientError, Result};
use crate::session::{Session, SessionStore};
use crate::types::{ClientConfig, UserPayload};
use greenroom_core::User;
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Main client for the Greenroom REST API.
///
/// Attaches the session's access token to every authorized call and, when
/// the server answers 401 `token_expired`, refreshes once and retries once.
/// A failed refresh clears the session and surfaces `SessionExpired`.
///
/// # Example
///
/// ```ignore
/// use greenroom_client::{ClientConfig, GreenroomClient, SessionStore};
/// use std::sync::Arc;
///
/// let session = Arc::new(SessionStore::new());
/// let client = GreenroomClient::new(ClientConfig::new("https://api.greenroom.fm"), session)?;
///
/// let user = client.login("kim@example.com", "hunter2").await?;
/// println!("Logged in as {} ({:?})", user.username, user.role);
///
/// let page = client.list_scrobbles(None, 20).await?;
/// println!("{} scrobbles", page.scrobbles.len());
/// ```
pub struct GreenroomClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    refresh_lock: Mutex<()>,
}

impl GreenroomClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ApiClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        let parsed =
            url::Url::parse(&base_url).map_err(|e| ApiClientError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(format!("Greenroom/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiClientError::Request)?;

        Ok(Self {
            http,
            base_url,
            session,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Get the API base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// The session store this client reads tokens from.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Check if the client has an access token.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Login with email and password.
    ///
    /// On success the session store holds the new tokens and user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let response = AuthClient::new(&self.http, &self.base_url)
            .login(email, password)
            .await?;

        let user = User::from(response.user);
        self.session.set_session(Session {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: Some(user.clone()),
        });

        Ok(user)
    }

    /// Clear stored tokens (logout).
    pub fn logout(&self) {
        self.session.clear();
        info!("Logged out");
    }

    /// Refresh the access token using the refresh token.
    ///
    /// Any failure clears the session and yields `SessionExpired`, as does a
    /// logout that happens while the refresh is in flight.
    pub async fn refresh_token(&self) -> Result<()> {
        let Some(refresh_token) = self.session.refresh_token() else {
            warn!("No refresh token available");
            self.session.clear();
            return Err(ApiClientError::SessionExpired);
        };

        match AuthClient::new(&self.http, &self.base_url)
            .refresh_token(&refresh_token)
            .await
        {
            Ok(response) => {
                if self
                    .session
                    .update_tokens(response.access_token, response.refresh_token)
                {
                    Ok(())
                } else {
                    warn!("Signed out while refreshing, dropping new tokens");
                    Err(ApiClientError::SessionExpired)
                }
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.session.clear();
                Err(ApiClientError::SessionExpired)
            }
        }
    }

    /// Validate the current access token without refreshing it.
    pub async fn validate_token(&self) -> Result<bool> {
        let Some(access_token) = self.session.access_token() else {
            return Ok(false);
        };

        match AuthClient::new(&self.http, &self.base_url)
            .get_current_user(&access_token)
            .await
        {
            Ok(_) => Ok(true),
            Err(ApiClientError::AuthFailed(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the signed-in user and store it on the session.
    pub async fn current_user(&self) -> Result<User> {
        let url = self.endpoint("/auth/me");
        let response = self.send_authorized(|http| http.get(&url)).await?;

        let payload: UserPayload = response.json().await.map_err(|e| {
            ApiClientError::ParseError(format!("Failed to parse user info: {}", e))
        })?;
        let user = User::from(payload);
        self.session.set_user(user.clone());

        Ok(user)
    }

    /// Send an authorized request, refreshing the token once on `token_expired`.
    ///
    /// `build` is called once per attempt and must produce the same request.
    /// Returns the response only if it is a success.
    pub(crate) async fn send_authorized<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self
            .session
            .access_token()
            .ok_or(ApiClientError::AuthRequired)?;

        let response = build(&self.http)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            return Ok(response);
        }
        if response.status().as_u16() != 401 {
            return Err(error_from_response(response).await);
        }

        let details = read_error_details(response).await;
        if !details.is_token_expired() {
            return Err(ApiClientError::AuthFailed(details.message_or_generic()));
        }

        warn!("Access token expired, attempting refresh");
        let token = self.refresh_after_expiry(&token).await?;

        debug!("Retrying request with refreshed token");
        let response = build(&self.http)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Refresh unless a concurrent request already did, returning the token to retry with.
    async fn refresh_after_expiry(&self, expired_token: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        match self.session.access_token() {
            Some(current) if current != expired_token => {
                debug!("Token already refreshed by a concurrent request");
                Ok(current)
            }
            Some(_) => {
                self.refresh_token().await?;
                self.session
                    .access_token()
                    .ok_or(ApiClientError::SessionExpired)
            }
            None => Err(ApiClientError::SessionExpired),
        }
    }
}
