//! HTML parsing via `tl` into the document model.

use anyhow::{Result, anyhow};

use super::{Attrs, Document, Element, Node, is_raw_text_element, unescape};

/// Parse an HTML page into a [`Document`].
pub fn parse_document(input: &str) -> Result<Document> {
    let dom = tl::parse(input, tl::ParserOptions::default())
        .map_err(|e| anyhow!("HTML parse failed: {e}"))?;
    let parser = dom.parser();

    let mut doc = Document {
        doctype: detect_doctype(input),
        roots: Vec::new(),
    };

    for handle in dom.children() {
        if let Some(node) = convert_node(*handle, parser, false) {
            doc.roots.push(node);
        }
    }

    Ok(doc)
}

/// Convert a tl node handle to a document node.
///
/// `in_raw_text` marks children of script/style, whose text is kept verbatim.
fn convert_node(handle: tl::NodeHandle, parser: &tl::Parser, in_raw_text: bool) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let tag_name = tag.name().as_utf8_str().to_lowercase();

            let mut attrs = Attrs::new();
            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                let value = value.map(|v| v.to_string()).unwrap_or_default();
                attrs.set(key, &unescape(&value));
            }

            let mut elem = Element::with_attrs(&tag_name, attrs);
            let raw_text = is_raw_text_element(&tag_name);
            for child in tag.children().top().iter() {
                if let Some(node) = convert_node(*child, parser, raw_text) {
                    elem.children.push(node);
                }
            }

            Some(Node::Element(Box::new(elem)))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if in_raw_text {
                Some(Node::Text(text.into_owned()))
            } else {
                Some(Node::Text(unescape(&text).into_owned()))
            }
        }
        tl::Node::Comment(bytes) => {
            let raw = bytes.as_utf8_str().into_owned();
            // The doctype is captured separately from the source prefix.
            if is_doctype(&raw) {
                None
            } else {
                Some(Node::Comment(raw))
            }
        }
    }
}

/// Capture the doctype line from the raw source, if present.
fn detect_doctype(input: &str) -> Option<String> {
    let trimmed = input.trim_start();
    if !is_doctype(trimmed) {
        return None;
    }
    let end = trimmed.find('>')?;
    Some(trimmed[..=end].to_string())
}

#[inline]
fn is_doctype(s: &str) -> bool {
    s.get(..9).is_some_and(|p| p.eq_ignore_ascii_case("<!doctype"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(doc: &Document) -> &Element {
        doc.roots
            .iter()
            .find_map(|n| match n {
                Node::Element(e) => Some(e.as_ref()),
                _ => None,
            })
            .expect("document should have an element")
    }

    #[test]
    fn test_parse_basic_page() {
        let doc = parse_document(
            "<!DOCTYPE html>\n<html><head></head><body><p>hi</p></body></html>",
        )
        .unwrap();
        assert_eq!(doc.doctype.as_deref(), Some("<!DOCTYPE html>"));
        let html = first_element(&doc);
        assert_eq!(html.tag, "html");
        assert_eq!(html.children.len(), 2);
    }

    #[test]
    fn test_parse_no_doctype() {
        let doc = parse_document("<div>x</div>").unwrap();
        assert_eq!(doc.doctype, None);
        assert_eq!(first_element(&doc).tag, "div");
    }

    #[test]
    fn test_parse_attributes_and_entities() {
        let doc = parse_document(r#"<img src="a&amp;b.svg" alt="logo">"#).unwrap();
        let img = first_element(&doc);
        assert_eq!(img.get_attr("src"), Some("a&b.svg"));
        assert_eq!(img.get_attr("alt"), Some("logo"));
    }

    #[test]
    fn test_parse_boolean_attribute() {
        let doc = parse_document("<input disabled>").unwrap();
        assert_eq!(first_element(&doc).get_attr("disabled"), Some(""));
    }

    #[test]
    fn test_parse_keeps_comments() {
        let doc = parse_document("<div><!-- note --></div>").unwrap();
        let div = first_element(&doc);
        assert!(matches!(&div.children[0], Node::Comment(c) if c.contains("note")));
    }

    #[test]
    fn test_parse_script_text_is_verbatim() {
        let doc = parse_document("<script>if (a &amp;&amp; b) {}</script>").unwrap();
        let script = first_element(&doc);
        // Raw text content is not entity-decoded
        assert_eq!(script.text_content(), "if (a &amp;&amp; b) {}");
    }

    #[test]
    fn test_parse_text_is_unescaped() {
        let doc = parse_document("<p>a &amp; b</p>").unwrap();
        assert_eq!(first_element(&doc).text_content(), "a & b");
    }
}
