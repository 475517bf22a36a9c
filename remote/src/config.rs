//! Remote endpoint configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::RemoteError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// `http://` or `https://` origin, without a trailing slash.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl RemoteConfig {
    /// Validate `base_url` and use the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::MissingBaseUrl`] for an empty URL and
    /// [`RemoteError::InvalidBaseUrl`] for anything that is not http(s).
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(RemoteError::MissingBaseUrl);
        }
        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"))
            .ok_or_else(|| RemoteError::InvalidBaseUrl(base_url.to_owned()))?;
        if host.is_empty() {
            return Err(RemoteError::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Self {
            base_url: base_url.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        })
    }

    /// Build config from environment variables.
    ///
    /// Required:
    /// - `SKETCH_BASE_URL`
    ///
    /// Optional:
    /// - `SKETCH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SKETCH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Same as [`RemoteConfig::new`].
    pub fn from_env() -> Result<Self, RemoteError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`RemoteConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`RemoteConfig::new`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RemoteError> {
        let base_url = lookup("SKETCH_BASE_URL").ok_or(RemoteError::MissingBaseUrl)?;
        let mut config = Self::new(&base_url)?;
        config.request_timeout_secs =
            parse_u64(lookup("SKETCH_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS);
        config.connect_timeout_secs =
            parse_u64(lookup("SKETCH_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS);
        Ok(config)
    }

    /// `{base}{path}`; `path` must start with `/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The base URL with its scheme swapped to `ws://` or `wss://`.
    #[must_use]
    pub fn ws_base(&self) -> String {
        if let Some(rest) = self.base_url.strip_prefix("https://") {
            return format!("wss://{rest}");
        }
        if let Some(rest) = self.base_url.strip_prefix("http://") {
            return format!("ws://{rest}");
        }
        self.base_url.clone()
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}
