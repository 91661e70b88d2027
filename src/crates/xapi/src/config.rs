//! Configuration for the X API transport.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Public API host.
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Connection settings for the X v2 API.
#[derive(Clone, Serialize, Deserialize)]
pub struct XApiConfig {
    /// API host without the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth 2.0 bearer token. User-context tokens are required for posting,
    /// likes and the home timeline.
    pub bearer_token: String,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl XApiConfig {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            bearer_token: bearer_token.into(),
            timeout: default_timeout(),
        }
    }

    /// Point the client at another host, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keep the token out of logs.
impl fmt::Debug for XApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XApiConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
