//! Lightweight HTML document model.
//!
//! Pages are parsed with `tl` into this model, mutated by the rewrite
//! transforms, and rendered back to HTML. The model keeps exactly what the
//! rewrite needs: element tags, attribute order, text, comments, and the
//! doctype line.
//!
//! # Modules
//!
//! - `html`: entity escaping and element classification
//! - `parse`: `tl` output -> document model
//! - `render`: document model -> HTML string

mod html;
mod parse;
mod render;

pub use html::{escape, escape_attr, is_raw_text_element, is_void_element, unescape};
pub use parse::parse_document;
pub use render::render_document;

use smallvec::SmallVec;

// =============================================================================
// Attributes
// =============================================================================

/// Attribute list preserving source order.
///
/// Lookups are linear; elements carry a handful of attributes at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute. Returns the removed value, if any.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Attrs {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut attrs = Self::new();
        for (key, value) in pairs {
            attrs.set(key, value);
        }
        attrs
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Box<Element>),
    /// Text content, stored unescaped (raw for script/style children).
    Text(String),
    /// Comment markup, emitted verbatim.
    Comment(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: SmallVec<[Node; 4]>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self::with_attrs(tag, Attrs::new())
    }

    pub fn with_attrs(tag: &str, attrs: Attrs) -> Self {
        Self {
            tag: tag.to_string(),
            attrs,
            children: SmallVec::new(),
        }
    }

    #[inline]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(elem) => collect_text(&elem.children, out),
            Node::Comment(_) => {}
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// A parsed page: optional doctype plus top-level nodes in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub doctype: Option<String>,
    pub roots: Vec<Node>,
}

impl Document {
    /// Find the first element with the given tag (depth-first).
    pub fn find_element(&self, tag: &str) -> Option<&Element> {
        find_in(&self.roots, tag)
    }
}

fn find_in<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        let Node::Element(elem) = node else { continue };
        if elem.is_tag(tag) {
            return Some(elem);
        }
        if let Some(found) = find_in(&elem.children, tag) {
            return Some(found);
        }
    }
    None
}
