//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every variant is terminal for the session that produced it: nothing in
/// filterlink retries a failed request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login or CSRF token request was rejected.
    #[error("Authentication failed (status {status}): {body}")]
    Authentication {
        /// HTTP status returned by the server.
        status: u16,
        /// Response body, or the reason it could not be read.
        body: String,
    },

    /// Any other non-success HTTP response.
    #[error("Request failed (status {status}): {body}")]
    Http {
        /// HTTP status returned by the server.
        status: u16,
        /// Response body, or the reason it could not be read.
        body: String,
    },

    /// A response body (or the JSON nested inside it) could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration or a credential that cannot be sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Referenced resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The filter engine refused an edit.
    #[error("Filter error: {0}")]
    Filter(String),
}

impl AppError {
    /// Returns the HTTP status attached to this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Filter(_) => "FILTER_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
