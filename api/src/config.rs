//! Client configuration

use std::time::Duration;

/// Configuration for the booking API client
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// Per-request timeout; there are no retries
    pub timeout: Duration,
}

impl ApiConfig {
    /// Default backend base URL
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";

    /// Default request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Configuration pointing at an explicit base URL with the default timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Read configuration from the environment
    ///
    /// - `BOOKING_API_URL`: base URL, default `http://localhost:3000`
    /// - `BOOKING_API_TIMEOUT_SECS`: timeout in seconds, default `15`
    ///
    /// An unparseable timeout falls back to the default rather than failing.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("BOOKING_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("BOOKING_API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(Self::DEFAULT_TIMEOUT, Duration::from_secs);

        Self { base_url, timeout }
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
