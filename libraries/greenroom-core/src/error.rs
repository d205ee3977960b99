/// Core error types for Greenroom
use thiserror::Error;

/// Result type alias using `GreenroomError`
pub type Result<T> = std::result::Result<T, GreenroomError>;

/// Core error type for Greenroom
#[derive(Error, Debug)]
pub enum GreenroomError {
    /// No session token is available
    #[error("Authentication required")]
    Unauthenticated,

    /// The session could not be refreshed and was cleared
    #[error("Session expired")]
    SessionExpired,

    /// The API answered with an error body
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The API could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Local persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl GreenroomError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the caller has to log in again before retrying
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionExpired)
    }
}
