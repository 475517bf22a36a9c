//! Remote adapter errors.

/// Failures from configuring or calling the remote API.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("missing base URL; set SKETCH_BASE_URL")]
    MissingBaseUrl,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
