//! First-`<svg>` extraction from fetched XML bodies.
//!
//! The body is walked as an XML event stream. The first start tag whose
//! local name is `svg` (self-or-descendant, document order) becomes the root
//! of the returned subtree; everything before it (XML declaration, doctype,
//! wrapper elements) is skipped. Attributes named in `strip_attrs` are
//! removed from the root element only.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::dom::{Attrs, Element, Node, unescape};

/// Why an XML body yielded no usable SVG subtree.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("response body is not well-formed XML: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("malformed attribute list: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("no <svg> element in response body")]
    MissingSvg,

    #[error("unexpected end of content inside <svg>")]
    Truncated,
}

/// Extract the first `svg` element from an XML body.
///
/// Returns the parsed subtree with `strip_attrs` removed from its root.
pub fn extract_svg(body: &str, strip_attrs: &[String]) -> Result<Element, SvgError> {
    let mut reader = Reader::from_str(body);

    loop {
        match reader.read_event()? {
            Event::Start(start) if is_svg(&start) => {
                let mut root = element_from_start(&start)?;
                read_children(&mut reader, &mut root)?;
                strip(&mut root, strip_attrs);
                return Ok(root);
            }
            Event::Empty(start) if is_svg(&start) => {
                let mut root = element_from_start(&start)?;
                strip(&mut root, strip_attrs);
                return Ok(root);
            }
            Event::Eof => return Err(SvgError::MissingSvg),
            _ => {}
        }
    }
}

#[inline]
fn is_svg(start: &BytesStart) -> bool {
    start.name().local_name().as_ref() == b"svg"
}

/// Build an element from a start tag, keeping qualified attribute names.
fn element_from_start(start: &BytesStart) -> Result<Element, SvgError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Attrs::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attribute.value).into_owned();
        attrs.set(&key, &unescape(&value));
    }
    Ok(Element::with_attrs(&tag, attrs))
}

/// Read the subtree of an already-opened element into `root`.
fn read_children(reader: &mut Reader<&[u8]>, root: &mut Element) -> Result<(), SvgError> {
    // Open elements below the root, deepest last.
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let elem = element_from_start(&start)?;
                append(&mut stack, root, Node::Element(Box::new(elem)));
            }
            Event::End(_) => match stack.pop() {
                Some(elem) => append(&mut stack, root, Node::Element(Box::new(elem))),
                // Closed the root element itself.
                None => return Ok(()),
            },
            Event::Text(text) => {
                let text = String::from_utf8_lossy(text.as_ref());
                let text = unescape(&text).into_owned();
                if !text.trim().is_empty() {
                    append(&mut stack, root, Node::Text(text));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(data.as_ref()).into_owned();
                append(&mut stack, root, Node::Text(text));
            }
            // Entity references in text arrive as their own events.
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(reference.as_ref());
                let text = unescape(&format!("&{name};")).into_owned();
                append(&mut stack, root, Node::Text(text));
            }
            Event::Eof => return Err(SvgError::Truncated),
            // Comments, PIs and nested doctypes are dropped.
            _ => {}
        }
    }
}

fn append(stack: &mut Vec<Element>, root: &mut Element, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.children.push(node),
    }
}

fn strip(root: &mut Element, strip_attrs: &[String]) {
    for name in strip_attrs {
        root.remove_attr(name);
    }
}
