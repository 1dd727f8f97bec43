//! Client configuration, explicit or from environment variables.

use crate::error::ConfigError;

/// Default public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.aperture.dev";

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`ApertureClient`](crate::ApertureClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,
    /// Primary API key, sent as a bearer credential.
    pub api_key: String,
    /// Per-request HTTP timeout in seconds (default: `30`). This bounds one
    /// HTTP round-trip, not a task resolution; that budget lives in
    /// [`poller`](crate::poller).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                         | Default                     |
    /// |---------------------------------|-----------------------------|
    /// | `APERTURE_API_KEY`              | required                    |
    /// | `APERTURE_BASE_URL`             | `https://api.aperture.dev`  |
    /// | `APERTURE_REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("APERTURE_API_KEY")
            .map_err(|_| ConfigError::MissingVar("APERTURE_API_KEY"))?;

        let base_url =
            std::env::var("APERTURE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let request_timeout_secs = match std::env::var("APERTURE_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                var: "APERTURE_REQUEST_TIMEOUT_SECS",
                message: format!("'{raw}' is not a valid number of seconds"),
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_key,
            request_timeout_secs,
        })
    }
}
