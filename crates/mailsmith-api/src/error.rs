//! Error types for mail API operations.

use serde::Deserialize;

/// Result type alias for mail API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Mail API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The message could not be encoded.
    #[error("Message encoding failed: {0}")]
    Encode(#[from] mailsmith_mime::Error),

    /// The API rejected the request.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },
}

impl Error {
    /// Creates an API error from a status code and message.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Returns true if the access token was rejected (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Google-style error body: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Inner error object of an [`ErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    /// Numeric code, usually the HTTP status.
    #[serde(default)]
    pub code: u16,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Symbolic status (e.g., `UNAUTHENTICATED`).
    #[serde(default)]
    pub status: String,
}

impl ErrorResponse {
    /// Converts to an Error.
    #[must_use]
    pub fn into_error(self, status: u16) -> Error {
        let ErrorDetail {
            message,
            status: symbol,
            ..
        } = self.error;
        if symbol.is_empty() {
            Error::api_error(status, message)
        } else {
            Error::api_error(status, format!("{symbol}: {message}"))
        }
    }

    /// Builds an error from a non-success response body, falling back to
    /// the raw text when it is not a Google-style error.
    #[must_use]
    pub fn from_body(status: u16, body: &str) -> Error {
        serde_json::from_str::<Self>(body).map_or_else(
            |_| Error::api_error(status, body.trim()),
            |response| response.into_error(status),
        )
    }
}
