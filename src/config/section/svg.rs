//! `[svg]` section configuration.
//!
//! What happens to fetched SVG markup before it lands in the page.
//!
//! # Example
//!
//! ```toml
//! [svg]
//! strip_attrs = ["xmlns:a"]  # attributes removed from the root element
//! optimize = false           # round-trip through usvg before inlining
//! dpi = 96.0                 # rendering DPI for the optimizer
//! ```
//!
//! `xmlns:a` is the Adobe viewer-extension namespace some exporters leave
//! behind; the W3C validator rejects it.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Attributes removed from the root `<svg>` element.
    pub strip_attrs: Vec<String>,

    /// Round-trip fetched SVGs through usvg before inlining.
    pub optimize: bool,

    /// DPI for usvg rendering calculations.
    pub dpi: f32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            strip_attrs: vec!["xmlns:a".to_string()],
            optimize: false,
            dpi: 96.0,
        }
    }
}

impl SvgConfig {
    /// Validate SVG configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dpi <= 0.0 {
            diag.error_with_hint(
                FieldPath("svg.dpi"),
                "must be positive",
                "remove the key to use the default (96.0)",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.svg.strip_attrs, ["xmlns:a"]);
        assert!(!config.svg.optimize);
        assert_eq!(config.svg.dpi, 96.0);
    }

    #[test]
    fn test_parsing() {
        let config =
            test_parse_config("[svg]\nstrip_attrs = [\"xmlns:a\", \"onload\"]\noptimize = true");
        assert_eq!(config.svg.strip_attrs, ["xmlns:a", "onload"]);
        assert!(config.svg.optimize);
    }

    #[test]
    fn test_validate_rejects_non_positive_dpi() {
        let config = test_parse_config("[svg]\ndpi = 0.0");
        let mut diag = ConfigDiagnostics::new();
        config.svg.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
