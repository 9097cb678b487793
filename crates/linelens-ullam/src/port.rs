//! Port trait implementation for `UllamClient`.
//!
//! This module implements the core-owned `GenerationPort` trait for
//! `UllamClient`, mapping internal errors into the core taxonomy at the
//! boundary.

use async_trait::async_trait;
use linelens_core::{GenerationError, GenerationPort, Message};
use tracing::{debug, warn};

use crate::client::UllamClient;
use crate::error::UllamError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `UllamError` to core `GenerationError`.
fn map_error(err: UllamError) -> GenerationError {
    match err {
        UllamError::Http { status, message } => {
            GenerationError::RequestFailed { status: Some(status), message }
        }
        UllamError::Network(e) => GenerationError::RequestFailed {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        },
        UllamError::InvalidConfig { message } => {
            GenerationError::RequestFailed { status: None, message }
        }
        UllamError::InvalidUrl(e) => {
            GenerationError::RequestFailed { status: None, message: e.to_string() }
        }
        UllamError::JsonParse(e) => GenerationError::MalformedResponse { message: e.to_string() },
        UllamError::MalformedResponse { message } => GenerationError::MalformedResponse { message },
    }
}

#[async_trait]
impl<B: HttpBackend> GenerationPort for UllamClient<B> {
    async fn generate(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        debug!(chars = message.len(), turns = history.len(), "sending generation request");
        match self.generate_text(message, history).await {
            Ok(text) => {
                debug!(chars = text.len(), "generation response received");
                Ok(text)
            }
            Err(error) => {
                warn!(%error, "generation request failed");
                Err(map_error(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UllamConfig;
    use crate::http::testing::FakeBackend;

    fn port_client(backend: FakeBackend) -> UllamClient<FakeBackend> {
        UllamClient::with_backend(backend, &UllamConfig::default()).expect("valid config")
    }

    #[tokio::test]
    async fn test_success_returns_text_through_the_port() {
        let client = port_client(FakeBackend::replying(r#"{"response":"all good"}"#));

        let text = client.generate("explain", &[]).await.unwrap();
        assert_eq!(text, "all good");
    }

    #[tokio::test]
    async fn test_http_error_maps_to_request_failed_with_status() {
        let client = port_client(FakeBackend::new(vec![Err(UllamError::Http {
            status: 500,
            message: "internal".to_string(),
        })]));

        let error = client.generate("explain", &[]).await.unwrap_err();
        match error {
            GenerationError::RequestFailed { status, message } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("internal"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_response_field_maps_to_malformed() {
        let client = port_client(FakeBackend::replying(r#"{"unexpected":"shape"}"#));

        let error = client.generate("explain", &[]).await.unwrap_err();
        assert!(matches!(error, GenerationError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_body_maps_to_malformed() {
        let client = port_client(FakeBackend::replying("not json at all"));

        let error = client.generate("explain", &[]).await.unwrap_err();
        assert!(matches!(error, GenerationError::MalformedResponse { .. }));
    }
}
