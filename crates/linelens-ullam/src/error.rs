//! Internal error types for Ullam operations.
//!
//! These errors are internal to `linelens-ullam` and are mapped to the
//! core `GenerationError` at the port boundary.

use thiserror::Error;

/// Result type alias for Ullam operations.
pub type UllamResult<T> = Result<T, UllamError>;

/// Errors related to the Ullam generation service.
#[derive(Debug, Error)]
pub enum UllamError {
    /// The service answered with a non-success HTTP status.
    #[error("Ullam request failed with status {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The service answered 2xx but the body is not a usable response.
    #[error("Malformed response from Ullam: {message}")]
    MalformedResponse {
        /// Description of what was wrong
        message: String,
    },

    /// Client configuration that cannot work.
    #[error("Invalid Ullam client configuration: {message}")]
    InvalidConfig {
        /// Description of the offending value
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
