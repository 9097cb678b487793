//! HTTP backend abstraction for the Ullam service.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest. There is no retry logic: a failed explanation request is
//! surfaced to the user, who re-triggers it.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::UllamConfig;
use crate::error::{UllamError, UllamResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST JSON and return the body text.
///
/// This is an implementation detail - external code should use the
/// `GenerationPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST a JSON body and return the response body of a 2xx answer.
    ///
    /// A non-success status is an `UllamError::Http` carrying the status
    /// code and whatever body text the service sent.
    async fn post_json(&self, url: &Url, body: &Value) -> UllamResult<String>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &UllamConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(&self, url: &Url, body: &Value) -> UllamResult<String> {
        let response = self.client.post(url.as_str()).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(UllamError::Http {
                status: status.as_u16(),
                message: if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                },
            })
        }
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
