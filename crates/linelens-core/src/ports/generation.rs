//! Port for the explanation-generation service.

use async_trait::async_trait;

use crate::domain::Message;

/// Errors the generation port can report.
///
/// Both variants surface to the person using the session as the same
/// generic non-fatal notice; the distinction exists for logging and tests.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The request could not be completed (transport failure, non-success
    /// status, timeout).
    #[error("generation request failed{}: {message}", status_suffix(*.status))]
    RequestFailed {
        /// HTTP status when the failure carried one.
        status: Option<u16>,
        message: String,
    },

    /// The service answered, but not in the expected shape.
    #[error("malformed generation response: {message}")]
    MalformedResponse { message: String },
}

fn status_suffix(status: Option<u16>) -> String {
    status.map_or_else(String::new, |code| format!(" (status {code})"))
}

/// Client port for the generation service.
///
/// One request, one response: the caller sends the instruction-wrapped
/// message plus the conversation so far and receives the explanation text.
/// Responses are already normalized to plain text by the adapter.
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Request an explanation.
    async fn generate(&self, message: &str, history: &[Message])
    -> Result<String, GenerationError>;
}
