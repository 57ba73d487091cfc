//! Configuration types for the Dennis client
//!
//! This module defines the settings a transport needs to reach the API.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. "https://dennis.example.com/api/v1")
    pub base_url: String,

    /// API token sent as a bearer credential
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration with default timeout and user agent
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `DENNIS_URL`: base URL (required)
    /// - `DENNIS_API_TOKEN`: API token (required)
    /// - `DENNIS_TIMEOUT_SECS`: request timeout (optional)
    /// - `DENNIS_USER_AGENT`: User-Agent header (optional)
    pub fn from_env() -> Result<Self, crate::Error> {
        let base_url = env::var("DENNIS_URL")
            .map_err(|_| crate::Error::config("DENNIS_URL is not set"))?;
        let api_token = env::var("DENNIS_API_TOKEN")
            .map_err(|_| crate::Error::config("DENNIS_API_TOKEN is not set"))?;

        let mut config = Self::new(base_url, api_token);

        if let Ok(timeout) = env::var("DENNIS_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                crate::Error::config(format!("DENNIS_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }
        if let Ok(user_agent) = env::var("DENNIS_USER_AGENT") {
            config.user_agent = user_agent;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("API base URL cannot be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(crate::Error::config(format!(
                "API base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.api_token.is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Timeout must be > 0"));
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("dennis-rs/", env!("CARGO_PKG_VERSION")).to_string()
}
