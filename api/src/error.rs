//! Error types for session persistence and HTTP calls.

/// Error returned by [`crate::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No server address is stored; requests are refused before any I/O.
    #[error("server address is not configured")]
    ServerNotConfigured,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// The backend answered with a non-success status. `detail` carries the
    /// backend's `detail` field when present, otherwise the raw body.
    #[error("server returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// True for 401/403 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

/// Error returned by [`crate::SessionStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("server address must start with http:// or https://: {0}")]
    InvalidServerUrl(String),
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
