use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported server url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}

/// Where the task service lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: Url,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        let server_url = Url::parse(server_url.trim())?;
        match server_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        Ok(Self {
            server_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Appends `path` to the configured base, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
