//! Narrative rendering — Markdown-flavored prose into [`RenderNode`] trees.
//!
//! Narrative explanations go through `pulldown-cmark` and come out as the
//! same inert tree model the markup parser produces, so the readable-text
//! extractor and the embedding UI treat both routes identically. Raw HTML
//! embedded in narrative text is dropped, never interpreted.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::domain::{ElementNode, RenderNode};

/// Render narrative text into a display tree.
///
/// Plain prose with no Markdown syntax becomes a single paragraph whose
/// readable text equals the input. A document with several blocks is
/// wrapped under a synthetic `div`, mirroring the markup builder.
#[must_use]
pub fn build_narrative_tree(input: &str) -> RenderNode {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut assembler = Assembler::default();
    for event in Parser::new_ext(input, options) {
        assembler.push_event(event);
    }
    assembler.finish()
}

#[derive(Default)]
struct Assembler {
    stack: Vec<ElementNode>,
    roots: Vec<RenderNode>,
}

impl Assembler {
    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.open(element("pre", vec![]));
                self.open(code_element(&kind));
            }
            Event::Start(tag) => self.open(container_for(&tag)),
            Event::End(TagEnd::CodeBlock) => {
                self.close();
                self.close();
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.attach(RenderNode::Text(text.into_string())),
            Event::Code(text) => self.attach(RenderNode::element(
                "code",
                vec![],
                vec![RenderNode::Text(text.into_string())],
            )),
            Event::SoftBreak => self.attach(RenderNode::text(" ")),
            Event::HardBreak => self.attach(RenderNode::element("br", vec![], vec![])),
            Event::Rule => self.attach(RenderNode::element("hr", vec![], vec![])),
            // Raw HTML inside narrative is never interpreted.
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }

    fn finish(mut self) -> RenderNode {
        while !self.stack.is_empty() {
            self.close();
        }
        if self.roots.len() == 1 {
            self.roots.remove(0)
        } else {
            RenderNode::element("div", vec![], self.roots)
        }
    }

    fn open(&mut self, el: ElementNode) {
        self.stack.push(el);
    }

    fn close(&mut self) {
        if let Some(el) = self.stack.pop() {
            // Empty tag marks a dropped container (raw HTML blocks and
            // anything unrecognized); its contents disappear with it.
            if !el.tag.is_empty() {
                self.attach(RenderNode::Element(el));
            }
        }
    }

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
}

fn element(tag: &str, attrs: Vec<(String, String)>) -> ElementNode {
    ElementNode { tag: tag.to_string(), attrs, children: vec![] }
}

fn code_element(kind: &CodeBlockKind<'_>) -> ElementNode {
    let attrs = match kind {
        CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
            vec![("data-language".to_string(), lang.to_string())]
        }
        _ => vec![],
    };
    element("code", attrs)
}

fn container_for(tag: &Tag<'_>) -> ElementNode {
    match tag {
        Tag::Paragraph => element("p", vec![]),
        Tag::Heading { level, .. } => element(heading_name(*level), vec![]),
        Tag::BlockQuote(..) => element("blockquote", vec![]),
        Tag::List(Some(start)) => {
            let attrs = if *start == 1 {
                vec![]
            } else {
                vec![("start".to_string(), start.to_string())]
            };
            element("ol", attrs)
        }
        Tag::List(None) => element("ul", vec![]),
        Tag::Item => element("li", vec![]),
        Tag::Emphasis => element("em", vec![]),
        Tag::Strong => element("strong", vec![]),
        Tag::Strikethrough => element("del", vec![]),
        Tag::Link { dest_url, title, .. } => {
            let mut attrs = vec![("href".to_string(), dest_url.to_string())];
            if !title.is_empty() {
                attrs.push(("title".to_string(), title.to_string()));
            }
            element("a", attrs)
        }
        Tag::Image { dest_url, title, .. } => {
            let mut attrs = vec![("src".to_string(), dest_url.to_string())];
            if !title.is_empty() {
                attrs.push(("title".to_string(), title.to_string()));
            }
            element("img", attrs)
        }
        Tag::Table(_) => element("table", vec![]),
        Tag::TableHead | Tag::TableRow => element("tr", vec![]),
        Tag::TableCell => element("td", vec![]),
        // Anything else (raw HTML blocks, metadata) is dropped wholesale.
        _ => element("", vec![]),
    }
}

const fn heading_name(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}
