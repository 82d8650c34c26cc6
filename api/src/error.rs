//! Error types for the booking API client

use thiserror::Error;

/// Errors that can occur when talking to the booking backend
///
/// Server error bodies carry a `{ "message": ... }` field; where the body
/// could be read, the extracted message travels with the variant so callers
/// can surface the server's wording. [`ApiError::user_message`] picks the
/// string to display: the server's message when present, otherwise the
/// caller's fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client could not be constructed
    #[error("Client configuration failed: {0}")]
    Configuration(String),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    TimedOut,

    /// Response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Server rejected the session token (401)
    #[error("Unauthorized - session token missing or rejected")]
    Unauthorized {
        /// Error message from the server, if the body carried one
        message: Option<String>,
    },

    /// Requested resource does not exist (404)
    #[error("Not found: {}", .message.as_deref().unwrap_or("resource does not exist"))]
    NotFound {
        /// Error message from the server, if the body carried one
        message: Option<String>,
    },

    /// Server returned any other error status
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the server, if the body carried one
        message: Option<String>,
    },
}

impl ApiError {
    /// User-facing message for this error
    ///
    /// Returns the server's `message` when the response carried one, else
    /// the supplied fallback. Transport-level failures (no response at all)
    /// always use the fallback.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthorized { message } | Self::NotFound { message } | Self::Api { message, .. } => {
                message
                    .clone()
                    .unwrap_or_else(|| fallback.to_string())
            },
            Self::Configuration(_)
            | Self::RequestFailed(_)
            | Self::TimedOut
            | Self::ResponseParseFailed(_) => fallback.to_string(),
        }
    }
}
