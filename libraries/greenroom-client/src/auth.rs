//! Authentication endpoints of the Greenroom API.

use crate::error::{error_from_response, map_send_error, read_error_details, ApiClientError, Result};
use crate::types::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, UserPayload};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Authentication client for the Greenroom API.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Login with email and password.
    ///
    /// Returns tokens and the user on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        debug!(url = %url, email = %email, "Attempting login");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if status.is_success() {
            let login_response: LoginResponse = response.json().await.map_err(|e| {
                ApiClientError::ParseError(format!("Failed to parse login response: {}", e))
            })?;

            info!(
                username = %login_response.user.username,
                user_id = %login_response.user.id,
                "Login successful"
            );

            Ok(login_response)
        } else if status.as_u16() == 401 {
            let details = read_error_details(response).await;
            warn!(status = %status, error = ?details.message, "Login failed: invalid credentials");
            Err(ApiClientError::AuthFailed(
                details
                    .message
                    .unwrap_or_else(|| "Invalid email or password".to_string()),
            ))
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        let url = format!("{}/auth/refresh", self.base_url);
        debug!(url = %url, "Refreshing access token");

        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if status.is_success() {
            let refresh_response: RefreshTokenResponse = response.json().await.map_err(|e| {
                ApiClientError::ParseError(format!("Failed to parse refresh response: {}", e))
            })?;

            debug!("Token refresh successful");
            Ok(refresh_response)
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            warn!(status = %status, "Token refresh rejected");
            Err(ApiClientError::SessionExpired)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Get the user an access token belongs to.
    pub async fn get_current_user(&self, access_token: &str) -> Result<UserPayload> {
        let url = format!("{}/auth/me", self.base_url);
        debug!(url = %url, "Getting current user info");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status().is_success() {
            response.json().await.map_err(|e| {
                ApiClientError::ParseError(format!("Failed to parse user info: {}", e))
            })
        } else {
            Err(error_from_response(response).await)
        }
    }
}
