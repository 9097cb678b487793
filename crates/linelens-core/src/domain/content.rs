//! Explanation results.

use serde::{Deserialize, Serialize};

use super::render::RenderNode;

/// How a returned explanation should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Markup fragment: parse into an element tree.
    Markup,
    /// Prose, possibly Markdown-flavored.
    Narrative,
}

impl ContentKind {
    /// Convert kind to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Narrative => "narrative",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One explanation returned by the generation service, rendered for
/// display.
///
/// The tree is built once when the result arrives and replaced wholesale
/// by the next result; it is never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// Raw text exactly as the service returned it.
    pub text: String,

    /// Detected rendering route.
    pub kind: ContentKind,

    /// Display tree handed to the embedding UI.
    pub tree: RenderNode,
}
