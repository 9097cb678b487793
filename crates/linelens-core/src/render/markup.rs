//! Inert markup parsing — HTML fragments into [`RenderNode`] trees.
//!
//! The generation service frequently answers with an HTML fragment. That
//! fragment is parsed here into plain data, never interpreted: there is no
//! script engine behind this parser, `<script>`/`<style>` bodies survive
//! only as raw text children, and attributes stay inert strings. Parsing
//! is total — any input, however malformed, yields a deterministic tree
//! and never panics.
//!
//! # Fragment rules
//!
//! - Tag names are lowercased; attribute names are lowercased, values kept
//!   verbatim (after entity decoding).
//! - The structural `class` attribute is renamed to the embedding
//!   framework's style-class key (see [`DEFAULT_STYLE_CLASS_KEY`]).
//! - Void elements and `/>` produce childless elements.
//! - Comments, doctypes, and processing instructions disappear.
//! - Unclosed elements close implicitly at end of input; a closing tag
//!   with no matching open element is ignored; a `<` that opens nothing
//!   is literal text.

use crate::domain::{ElementNode, RenderNode};

/// Attribute key the structural `class` attribute is renamed to, matching
/// the prop name of the downstream node factory.
pub const DEFAULT_STYLE_CLASS_KEY: &str = "className";

/// Elements that never take children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose bodies are raw text, captured without interpretation.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse an HTML fragment into a display tree.
///
/// A fragment with exactly one root node returns that node; zero or
/// several roots are wrapped under a synthetic `div`.
#[must_use]
pub fn build_markup_tree(input: &str, style_class_key: &str) -> RenderNode {
    let mut roots = Parser::new(input, style_class_key).run();
    if roots.len() == 1 {
        roots.remove(0)
    } else {
        RenderNode::element("div", vec![], roots)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    style_class_key: &'a str,
    stack: Vec<ElementNode>,
    roots: Vec<RenderNode>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, style_class_key: &'a str) -> Self {
        Self { input, pos: 0, style_class_key, stack: Vec::new(), roots: Vec::new() }
    }

    fn run(mut self) -> Vec<RenderNode> {
        while self.pos < self.input.len() {
            if self.rest().starts_with("<!--") {
                self.skip_comment();
            } else if self.rest().starts_with("<!") || self.rest().starts_with("<?") {
                self.skip_through('>');
            } else if self.rest().starts_with("</") {
                self.consume_closing_tag();
            } else if self.at_open_tag() {
                self.consume_open_tag();
            } else {
                self.consume_text();
            }
        }

        // End of input closes whatever is still open.
        while let Some(el) = self.stack.pop() {
            self.attach(RenderNode::Element(el));
        }
        self.roots
    }

    // ── Cursor helpers ─────────────────────────────────────────────

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Advance past the next occurrence of `delim` (or to end of input).
    fn skip_through(&mut self, delim: char) {
        match self.rest().find(delim) {
            Some(idx) => self.pos += idx + delim.len_utf8(),
            None => self.pos = self.input.len(),
        }
    }

    fn skip_comment(&mut self) {
        self.pos += 4; // "<!--"
        match self.rest().find("-->") {
            Some(idx) => self.pos += idx + 3,
            None => self.pos = self.input.len(),
        }
    }

    /// True when the cursor sits on `<` followed by a tag-name character.
    fn at_open_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    // ── Tree assembly ──────────────────────────────────────────────

    /// Attach a finished node to the current open element, or to the root
    /// list when nothing is open. Adjacent text nodes merge.
    fn attach(&mut self, node: RenderNode) {
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        if let (Some(RenderNode::Text(prev)), RenderNode::Text(next)) =
            (siblings.last_mut(), &node)
        {
            prev.push_str(next);
        } else {
            siblings.push(node);
        }
    }

    // ── Token consumers ────────────────────────────────────────────

    fn consume_text(&mut self) {
        let start = self.pos;
        // A lone `<` that opens no construct is literal text, so step over
        // it before scanning for the next one.
        if self.peek() == Some('<') {
            self.bump();
        }
        match self.rest().find('<') {
            Some(idx) => self.pos += idx,
            None => self.pos = self.input.len(),
        }
        let raw = &self.input[start..self.pos];
        if !raw.is_empty() {
            self.attach(RenderNode::Text(decode_entities(raw)));
        }
    }

    fn consume_closing_tag(&mut self) {
        self.pos += 2; // "</"
        let name = self.read_tag_name();
        self.skip_through('>');

        if name.is_empty() || !self.stack.iter().any(|el| el.tag == name) {
            return; // unmatched closer: ignored
        }
        // Close intermediate elements implicitly, then the named one.
        while let Some(el) = self.stack.pop() {
            let done = el.tag == name;
            self.attach(RenderNode::Element(el));
            if done {
                break;
            }
        }
    }

    fn consume_open_tag(&mut self) {
        self.bump(); // '<'
        let tag = self.read_tag_name();
        let (attrs, self_closed) = self.read_attributes();

        if self_closed || VOID_ELEMENTS.contains(&tag.as_str()) {
            self.attach(RenderNode::Element(ElementNode { tag, attrs, children: vec![] }));
        } else if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let body = self.consume_raw_text(&tag);
            let children = if body.is_empty() { vec![] } else { vec![RenderNode::Text(body)] };
            self.attach(RenderNode::Element(ElementNode { tag, attrs, children }));
        } else {
            self.stack.push(ElementNode { tag, attrs, children: vec![] });
        }
    }

    /// Capture everything up to the matching close tag, verbatim.
    fn consume_raw_text(&mut self, tag: &str) -> String {
        let closer = format!("</{tag}");
        let rest = self.rest();
        match find_case_insensitive(rest, &closer) {
            Some(idx) => {
                let body = rest[..idx].to_string();
                self.pos += idx;
                self.skip_through('>');
                body
            }
            None => {
                let body = rest.to_string();
                self.pos = self.input.len();
                body
            }
        }
    }

    fn read_tag_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':')
        {
            self.bump();
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    /// Read attributes up to (and past) the closing `>`. Returns the pairs
    /// in source order and whether the tag ended with `/>`.
    fn read_attributes(&mut self) -> (Vec<(String, String)>, bool) {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return (attrs, false),
                Some('>') => {
                    self.bump();
                    return (attrs, false);
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        return (attrs, true);
                    }
                }
                Some(_) => {
                    let name = self.read_attribute_name();
                    if name.is_empty() {
                        // Not a name character; discard it and move on.
                        self.bump();
                        continue;
                    }
                    let value = self.read_attribute_value();
                    let key = if name == "class" {
                        self.style_class_key.to_string()
                    } else {
                        name
                    };
                    attrs.push((key, value));
                }
            }
        }
    }

    fn read_attribute_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
        {
            self.bump();
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn read_attribute_value(&mut self) -> String {
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return String::new(); // bare attribute
        }
        self.bump();
        self.skip_whitespace();

        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.bump();
                }
                let raw = &self.input[start..self.pos];
                self.bump(); // closing quote
                decode_entities(raw)
            }
            _ => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| !c.is_whitespace() && c != '>')
                {
                    self.bump();
                }
                decode_entities(&self.input[start..self.pos])
            }
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Decode the entity forms the explainer output actually uses: the five
/// predefined named entities plus `&nbsp;` and numeric references.
/// Anything unrecognized passes through verbatim.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match rest[1..].find(';') {
            // Entities are short; a distant semicolon means this `&` is literal.
            Some(semi) if semi <= 10 => {
                let body = &rest[1..=semi];
                match decode_entity_body(body) {
                    Some(decoded) => {
                        out.push(decoded);
                        rest = &rest[semi + 2..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity_body(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = digits
                .strip_prefix(['x', 'X'])
                .map_or_else(|| digits.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok())?;
            char::from_u32(code)
        }
    }
}

fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
