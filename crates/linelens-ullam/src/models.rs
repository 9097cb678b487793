//! Wire types for the Ullam generation endpoint.
//!
//! These types are internal to `linelens-ullam` and are not exposed to
//! consumers. External consumers interact through the `GenerationPort`
//! trait from `linelens-core`.

use linelens_core::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{UllamError, UllamResult};

// ============================================================================
// Request
// ============================================================================

/// Body of a generation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    /// Instruction-wrapped prompt.
    pub message: &'a str,
    /// Prior conversation turns, oldest first.
    pub history: &'a [Message],
}

// ============================================================================
// Response
// ============================================================================

/// Body of a generation response.
///
/// The service answers `{ "response": ... }` where the value is usually a
/// string but may be structured JSON.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<Value>,
}

impl GenerateResponse {
    /// Reduce the `response` value to display text.
    ///
    /// Strings pass through unchanged; structured values serialize to
    /// their canonical JSON text. A missing, null, or empty-string value
    /// is a malformed response.
    pub fn into_text(self) -> UllamResult<String> {
        match self.response {
            None | Some(Value::Null) => Err(UllamError::MalformedResponse {
                message: "response field is missing or null".to_string(),
            }),
            Some(Value::String(text)) => {
                if text.is_empty() {
                    Err(UllamError::MalformedResponse {
                        message: "response field is an empty string".to_string(),
                    })
                } else {
                    Ok(text)
                }
            }
            Some(other) => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response_from(body: Value) -> GenerateResponse {
        serde_json::from_value(body).expect("deserializes")
    }

    #[test]
    fn test_request_serializes_with_camel_case_fields() {
        let history = vec![Message::user("hi"), Message::agent("hello")];
        let request = GenerateRequest { message: "explain this", history: &history };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["message"], "explain this");
        assert_eq!(body["history"][0]["text"], "hi");
        assert_eq!(body["history"][0]["sender"], "user");
        assert_eq!(body["history"][1]["sender"], "agent");
    }

    #[test]
    fn test_string_response_passes_through() {
        let text = response_from(json!({"response": "<p>done</p>"})).into_text().unwrap();
        assert_eq!(text, "<p>done</p>");
    }

    #[test]
    fn test_structured_response_serializes_to_json_text() {
        let text = response_from(json!({"response": {"summary": "adds numbers", "bugs": []}}))
            .into_text()
            .unwrap();
        assert_eq!(text, r#"{"bugs":[],"summary":"adds numbers"}"#);

        let text = response_from(json!({"response": ["a", "b"]})).into_text().unwrap();
        assert_eq!(text, r#"["a","b"]"#);

        let text = response_from(json!({"response": 42})).into_text().unwrap();
        assert_eq!(text, "42");
    }

    #[test]
    fn test_missing_null_or_empty_response_is_malformed() {
        for body in [json!({}), json!({"response": null}), json!({"response": ""})] {
            let result = response_from(body.clone()).into_text();
            assert!(
                matches!(result, Err(UllamError::MalformedResponse { .. })),
                "expected malformed for {body}, got {result:?}"
            );
        }
    }
}
