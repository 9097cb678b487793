//! Readable-text extraction — what a listener should hear.
//!
//! Walks a display tree in document order and flattens the visible text
//! the way a screen reader would: non-displayed containers are skipped,
//! fragments join with single spaces, and whitespace never stacks up.

use crate::domain::RenderNode;

/// Containers whose contents are never spoken.
const SILENT_ELEMENTS: &[&str] = &["script", "style"];

/// Extract the listener-ready text of a display tree.
///
/// The result is trimmed, contains no consecutive whitespace, and is empty
/// when the tree has nothing speakable — an empty result is not an error,
/// the caller decides how to surface it.
#[must_use]
pub fn readable_text(root: &RenderNode) -> String {
    let mut fragments = Vec::new();
    collect(root, &mut fragments);
    collapse_whitespace(&fragments.join(" "))
}

fn collect<'a>(node: &'a RenderNode, fragments: &mut Vec<&'a str>) {
    match node {
        RenderNode::Text(text) => {
            if !text.trim().is_empty() {
                fragments.push(text);
            }
        }
        RenderNode::Element(el) => {
            if SILENT_ELEMENTS.contains(&el.tag.as_str()) {
                return;
            }
            for child in &el.children {
                collect(child, fragments);
            }
        }
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::markup::{DEFAULT_STYLE_CLASS_KEY, build_markup_tree};
    use crate::render::narrative::build_narrative_tree;

    fn from_markup(input: &str) -> String {
        readable_text(&build_markup_tree(input, DEFAULT_STYLE_CLASS_KEY))
    }

    #[test]
    fn markup_flattens_to_spoken_text() {
        assert_eq!(from_markup("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn nested_blocks_join_with_single_spaces() {
        let text = from_markup("<div><h1>Loops</h1><p>They repeat.</p></div>");
        assert_eq!(text, "Loops They repeat.");
    }

    #[test]
    fn script_and_style_content_is_silent() {
        let text = from_markup(
            "<div><style>.a{color:red}</style><p>visible</p><script>alert(1)</script></div>",
        );
        assert_eq!(text, "visible");
    }

    #[test]
    fn whitespace_only_text_nodes_are_skipped() {
        assert_eq!(from_markup("<div>  \n  <p>a</p> \t <p>b</p></div>"), "a b");
    }

    #[test]
    fn interior_whitespace_collapses() {
        assert_eq!(from_markup("<p>a   lot \n of   space</p>"), "a lot of space");
    }

    #[test]
    fn output_never_contains_double_spaces() {
        let text = from_markup("<div><p> a </p><p> b </p><p>\u{a0}\u{a0}c</p></div>");
        assert!(!text.contains("  "), "got {text:?}");
        assert_eq!(text, "a b c");
    }

    #[test]
    fn plain_text_survives_extraction_unchanged() {
        let input = "The loop runs three times.";
        let once = readable_text(&build_narrative_tree(input));
        assert_eq!(once, input);

        // Extraction is idempotent: re-rendering extracted text and
        // extracting again changes nothing.
        let twice = readable_text(&build_narrative_tree(&once));
        assert_eq!(twice, once);
    }

    #[test]
    fn narrative_markdown_loses_its_syntax_when_spoken() {
        let text = readable_text(&build_narrative_tree("# Loops\n\nThey *repeat* `n` times."));
        assert_eq!(text, "Loops They repeat n times.");
    }

    #[test]
    fn empty_tree_yields_empty_text() {
        assert_eq!(from_markup(""), "");
        assert_eq!(from_markup("<div><script>x</script></div>"), "");
    }

    #[test]
    fn tamil_text_flattens_cleanly() {
        let text = from_markup("<p>இது ஒரு <b>மடக்கு</b> ஆகும்</p>");
        assert_eq!(text, "இது ஒரு மடக்கு ஆகும்");
    }
}
