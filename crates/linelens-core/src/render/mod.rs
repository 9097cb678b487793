//! The content rendering pipeline.
//!
//! Explanations arrive as untyped text and leave as inert display trees
//! plus listener-ready speech text:
//!
//! 1. [`classify`] decides whether text is a markup fragment or narrative
//!    prose (the heuristic is pluggable).
//! 2. [`markup`] parses fragments with a non-executing parser;
//!    [`narrative`] renders prose through Markdown. Both produce the same
//!    [`RenderNode`](crate::domain::RenderNode) model.
//! 3. [`speech_text`] flattens whichever tree is displayed into the text
//!    handed to the speech engine.
//!
//! Everything in this module is pure and deterministic: the same input
//! always produces the same tree, and nothing here performs I/O.

pub mod classify;
pub mod markup;
pub mod narrative;
pub mod speech_text;

pub use classify::{ContentClassifier, LeadingTagClassifier};
pub use markup::{DEFAULT_STYLE_CLASS_KEY, build_markup_tree};
pub use narrative::build_narrative_tree;
pub use speech_text::readable_text;

use crate::domain::{ContentKind, Explanation, RenderNode};

/// Render text through the route its kind selects.
#[must_use]
pub fn render_tree(text: &str, kind: ContentKind, style_class_key: &str) -> RenderNode {
    match kind {
        ContentKind::Markup => build_markup_tree(text, style_class_key),
        ContentKind::Narrative => build_narrative_tree(text),
    }
}

/// Classify service output and build its display tree in one step.
#[must_use]
pub fn render_explanation(
    text: impl Into<String>,
    classifier: &dyn ContentClassifier,
    style_class_key: &str,
) -> Explanation {
    let text = text.into();
    let kind = classifier.classify(&text);
    let tree = render_tree(&text, kind, style_class_key);
    Explanation { text, kind, tree }
}
