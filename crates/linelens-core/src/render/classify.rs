//! Content classification: markup fragment or narrative prose.
//!
//! The generation service answers with either an HTML fragment or
//! Markdown-flavored prose, with no content-type signal anywhere in the
//! response. Classification decides which renderer a result goes through.

use crate::domain::ContentKind;

/// Decides how a returned explanation should be rendered.
///
/// The heuristic sits behind a trait so a smarter classifier (a real
/// sniffer, a model-reported content type) can replace it without touching
/// the session.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> ContentKind;
}

/// The stock rule: content whose first non-whitespace character is `<` is
/// markup; everything else is narrative.
///
/// Empty input classifies as narrative.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingTagClassifier;

impl ContentClassifier for LeadingTagClassifier {
    fn classify(&self, text: &str) -> ContentKind {
        if text.trim_start().starts_with('<') {
            ContentKind::Markup
        } else {
            ContentKind::Narrative
        }
    }
}
