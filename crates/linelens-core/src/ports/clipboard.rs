//! Port for the host clipboard.

use async_trait::async_trait;

/// Error copying to the host clipboard.
#[derive(Debug, thiserror::Error)]
#[error("clipboard copy failed: {message}")]
pub struct ClipboardError {
    pub message: String,
}

/// Best-effort write access to the host clipboard.
///
/// Copying is fire-and-forget from the session's point of view: a failure
/// becomes a non-fatal notice and nothing retries.
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), ClipboardError>;
}
