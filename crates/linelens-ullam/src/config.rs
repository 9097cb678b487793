//! Public configuration for the Ullam client.

use std::time::Duration;

use crate::error::{UllamError, UllamResult};

/// Production endpoint of the Ullam generation service.
pub const DEFAULT_ENDPOINT: &str = "https://genai-tools.skcript.com/api/ullam";

/// Configuration for the Ullam client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use linelens_ullam::UllamConfig;
/// use std::time::Duration;
///
/// let config = UllamConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct UllamConfig {
    /// Endpoint URL of the generation service
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Whole-request timeout
    pub(crate) timeout: Duration,
    /// Connection establishment timeout
    pub(crate) connect_timeout: Duration,
}

impl Default for UllamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("linelens-ullam/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl UllamConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL of the generation service.
    ///
    /// Defaults to [`DEFAULT_ENDPOINT`].
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the whole-request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection establishment timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Check the configuration for values that cannot work.
    pub(crate) fn validate(&self) -> UllamResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(UllamError::InvalidConfig { message: "base URL is empty".to_string() });
        }
        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(UllamError::InvalidConfig { message: "timeout is zero".to_string() });
        }
        Ok(())
    }
}
