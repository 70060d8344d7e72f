//! Framework bootstrap injector.
//!
//! Appends `<script>{init}</script>` to `<body>` so the configured UI
//! framework setup entry point runs once when the page loads. Injection is
//! idempotent: a page whose scripts already contain the init statement is
//! left alone, so repeated runs never stack bootstrap calls.

use crate::config::InjectConfig;
use crate::dom::{Document, Element, Node};

/// Injects the framework init script into `<body>`
pub struct InitInjector<'a> {
    config: &'a InjectConfig,
}

impl<'a> InitInjector<'a> {
    pub fn new(config: &'a InjectConfig) -> Self {
        Self { config }
    }

    /// Inject the bootstrap script. Returns true when a script was added.
    ///
    /// A page without a `<body>` element is left unchanged.
    pub fn apply(&self, doc: &mut Document) -> bool {
        if !self.config.enabled() {
            return false;
        }

        let init = self.config.init.trim();
        if has_init(&doc.roots, init) {
            return false;
        }

        for node in &mut doc.roots {
            if let Node::Element(elem) = node
                && inject_body(elem, init)
            {
                return true;
            }
        }
        false
    }
}

/// Recursively find `<body>` and append the bootstrap script.
fn inject_body(elem: &mut Element, init: &str) -> bool {
    if elem.is_tag("body") {
        let mut script = Element::new("script");
        script.push(Node::Text(init.to_string()));
        elem.push(Node::Element(Box::new(script)));
        return true;
    }

    for child in &mut elem.children {
        if let Node::Element(elem) = child
            && inject_body(elem, init)
        {
            return true;
        }
    }
    false
}

/// Check whether any script on the page already contains the init statement.
fn has_init(nodes: &[Node], init: &str) -> bool {
    for node in nodes {
        let Node::Element(elem) = node else { continue };
        if elem.is_tag("script") && elem.text_content().contains(init) {
            return true;
        }
        if has_init(&elem.children, init) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_document, render_document};

    const INIT: &str = "$(document).foundation();";

    fn inject_config() -> InjectConfig {
        InjectConfig {
            init: INIT.to_string(),
        }
    }

    #[test]
    fn test_injects_into_body() {
        let config = inject_config();
        let mut doc = parse_document("<html><body><p>x</p></body></html>").unwrap();
        assert!(InitInjector::new(&config).apply(&mut doc));
        assert_eq!(
            render_document(&doc),
            "<html><body><p>x</p><script>$(document).foundation();</script></body></html>"
        );
    }

    #[test]
    fn test_disabled_without_init() {
        let config = InjectConfig::default();
        let mut doc = parse_document("<html><body></body></html>").unwrap();
        assert!(!InitInjector::new(&config).apply(&mut doc));
    }

    #[test]
    fn test_idempotent() {
        let config = inject_config();
        let mut doc = parse_document("<html><body></body></html>").unwrap();
        assert!(InitInjector::new(&config).apply(&mut doc));
        assert!(!InitInjector::new(&config).apply(&mut doc));
        let html = render_document(&doc);
        assert_eq!(html.matches("foundation()").count(), 1);
    }

    #[test]
    fn test_existing_init_script_is_respected() {
        let config = inject_config();
        let mut doc = parse_document(
            "<html><body><script>$(document).foundation();</script></body></html>",
        )
        .unwrap();
        assert!(!InitInjector::new(&config).apply(&mut doc));
    }

    #[test]
    fn test_page_without_body_is_unchanged() {
        let config = inject_config();
        let mut doc = parse_document("<div>fragment</div>").unwrap();
        let before = doc.clone();
        assert!(!InitInjector::new(&config).apply(&mut doc));
        assert_eq!(doc, before);
    }
}
