//! Ullam client for requesting code explanations.
//!
//! This module provides the main client for talking to the Ullam
//! generation endpoint. Port-trait plumbing lives in `port.rs`.

use linelens_core::Message;
use url::Url;

use crate::config::UllamConfig;
use crate::error::UllamResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{GenerateRequest, GenerateResponse};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default Ullam client using the reqwest HTTP backend.
pub type DefaultUllamClient = UllamClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the Ullam generation service.
///
/// This client is generic over an HTTP backend, allowing for easy testing.
/// Use `DefaultUllamClient` for production code.
pub struct UllamClient<B: HttpBackend> {
    pub(crate) backend: B,
    endpoint: Url,
}

impl DefaultUllamClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the configuration cannot work: an empty or unparsable
    /// endpoint URL, or a zero timeout.
    pub fn new(config: &UllamConfig) -> UllamResult<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.base_url)?;
        Ok(Self { backend: ReqwestBackend::new(config), endpoint })
    }

    /// Create a new client against the production endpoint.
    pub fn default_client() -> UllamResult<Self> {
        Self::new(&UllamConfig::default())
    }
}

impl<B: HttpBackend> UllamClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) fn with_backend(backend: B, config: &UllamConfig) -> UllamResult<Self> {
        config.validate()?;
        Ok(Self { backend, endpoint: Url::parse(&config.base_url)? })
    }

    /// Send one explanation request and reduce the answer to text.
    pub(crate) async fn generate_text(
        &self,
        message: &str,
        history: &[Message],
    ) -> UllamResult<String> {
        let request = GenerateRequest { message, history };
        let body = serde_json::to_value(&request)?;

        let reply = self.backend.post_json(&self.endpoint, &body).await?;
        let response: GenerateResponse = serde_json::from_str(&reply)?;
        response.into_text()
    }
}
