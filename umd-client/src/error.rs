//! Client error types

use thiserror::Error;

/// Result type for backend API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the backend API wrappers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication required or token rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Map a non-success response status to the matching error variant
    pub(crate) fn from_status(status: u16, path: &str, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(path.to_string()),
            _ => ApiError::Api(status, body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
