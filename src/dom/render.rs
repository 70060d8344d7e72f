//! HTML rendering of the document model.

use super::{Document, Element, Node, escape, escape_attr, is_raw_text_element, is_void_element};

/// Render a [`Document`] back to an HTML string.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::with_capacity(1024);
    // Whitespace after the doctype survives as a text root, so nothing is
    // inserted here.
    if let Some(doctype) = &doc.doctype {
        out.push_str(doctype);
    }
    for node in &doc.roots {
        render_node(node, false, &mut out);
    }
    out
}

fn render_node(node: &Node, foreign: bool, out: &mut String) {
    match node {
        Node::Element(elem) => render_element(elem, foreign, out),
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Comment(raw) => {
            if raw.starts_with("<!") {
                out.push_str(raw);
            } else {
                out.push_str("<!--");
                out.push_str(raw);
                out.push_str("-->");
            }
        }
    }
}

fn render_element(elem: &Element, foreign: bool, out: &mut String) {
    out.push('<');
    out.push_str(&elem.tag);
    for (key, value) in elem.attrs.iter() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    // svg/math subtrees follow XML conventions: childless elements self-close.
    let foreign = foreign || elem.tag == "svg" || elem.tag == "math";

    if !foreign && is_void_element(&elem.tag) {
        out.push('>');
        return;
    }
    if foreign && elem.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if is_raw_text_element(&elem.tag) {
        for child in &elem.children {
            if let Node::Text(text) = child {
                out.push_str(text);
            }
        }
    } else {
        for child in &elem.children {
            render_node(child, foreign, out);
        }
    }
    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
}
