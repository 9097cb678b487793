//! The inert display tree.
//!
//! Explanations are rendered into a [`RenderNode`] tree that an embedding
//! UI hands to its own node factory. Nodes carry only data — tag names,
//! attribute strings, text — never callable behavior, so handing the tree
//! to a renderer can not execute anything that arrived in the content.

use serde::{Deserialize, Serialize};

/// One node of the display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderNode {
    Element(ElementNode),
    Text(String),
}

/// An element node: lowercased tag, attributes in source order, children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    /// Attribute name/value pairs exactly as they appeared, in order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Build an element node.
    #[must_use]
    pub fn element(
        tag: impl Into<String>,
        attrs: Vec<(String, String)>,
        children: Vec<Self>,
    ) -> Self {
        Self::Element(ElementNode { tag: tag.into(), attrs, children })
    }

    /// Build a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// The element form of this node, if it is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// The text content of this node, if it is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Element(_) => None,
            Self::Text(t) => Some(t),
        }
    }
}

impl ElementNode {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
