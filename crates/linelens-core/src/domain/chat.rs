//! Conversation transcript types.
//!
//! These types represent the exchange between the person asking for an
//! explanation and the generation service, independent of any transport
//! concerns. The transcript doubles as the `history` field of the wire
//! request, so both types serialize with the wire's field names.

use serde::{Deserialize, Serialize};

/// A single entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    /// A message authored by the person using the session.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    /// A message authored by the generation service.
    #[must_use]
    pub fn agent(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Agent }
    }
}

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

impl Sender {
    /// Parse a sender from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }

    /// Convert sender to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
