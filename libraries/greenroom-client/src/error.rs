//! Error types for the Greenroom API client.

use greenroom_core::GreenroomError;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Message shown when the server gives us nothing usable
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when talking to the Greenroom API.
#[derive(Error, Debug)]
pub enum ApiClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The access token expired and could not be refreshed
    #[error("Session expired")]
    SessionExpired,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for API client operations.
pub type Result<T> = std::result::Result<T, ApiClientError>;

impl From<ApiClientError> for GreenroomError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::AuthRequired => GreenroomError::Unauthenticated,
            ApiClientError::SessionExpired => GreenroomError::SessionExpired,
            ApiClientError::Api {
                status,
                code,
                message,
            } => GreenroomError::Api {
                status,
                code,
                message,
            },
            ApiClientError::AuthFailed(message) => GreenroomError::Api {
                status: 401,
                code: None,
                message,
            },
            ApiClientError::ServerUnreachable(msg) => GreenroomError::Network(msg),
            ApiClientError::Request(e) => GreenroomError::Network(e.to_string()),
            other => GreenroomError::Other(other.to_string()),
        }
    }
}

/// The `error` field of an error body, in either shape the API uses
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Detailed {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorField,
}

/// Normalized error body: `{ error: string }` or `{ error: { code, message } }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ErrorDetails {
    /// Parse a raw body; non-JSON bodies become the message as-is
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope {
                error: ErrorField::Message(message),
            }) => Self {
                code: None,
                message: Some(message),
            },
            Ok(ErrorEnvelope {
                error: ErrorField::Detailed { code, message },
            }) => Self { code, message },
            Err(_) => {
                let text = body.trim();
                let looks_like_json = text.starts_with('{') || text.starts_with('[');
                Self {
                    code: None,
                    message: (!text.is_empty() && !looks_like_json).then(|| text.to_string()),
                }
            }
        }
    }

    /// Whether the server says the access token expired
    pub fn is_token_expired(&self) -> bool {
        let is_marker = |v: &Option<String>| {
            v.as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("token_expired"))
        };
        is_marker(&self.code) || is_marker(&self.message)
    }

    /// Human-readable message with the generic fallback
    pub fn message_or_generic(&self) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }

    pub(crate) fn into_error(self, status: u16) -> ApiClientError {
        let message = self.message_or_generic();
        ApiClientError::Api {
            status,
            code: self.code,
            message,
        }
    }
}

/// Map a transport failure, singling out unreachable servers
pub(crate) fn map_send_error(e: reqwest::Error) -> ApiClientError {
    if e.is_connect() || e.is_timeout() {
        ApiClientError::ServerUnreachable(e.to_string())
    } else {
        ApiClientError::Request(e)
    }
}

/// Read the body of a non-success response
pub(crate) async fn read_error_details(response: reqwest::Response) -> ErrorDetails {
    let body = response.text().await.unwrap_or_default();
    ErrorDetails::parse(&body)
}

/// Convert a non-success response into an error
pub(crate) async fn error_from_response(response: reqwest::Response) -> ApiClientError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return ApiClientError::RateLimited { retry_after_secs };
    }

    let details = read_error_details(response).await;
    debug!(status, code = ?details.code, message = ?details.message, "API error response");

    if status == 401 {
        return ApiClientError::AuthFailed(details.message_or_generic());
    }

    details.into_error(status)
}
