//! `[select]` section configuration.
//!
//! Which `<img>` elements get inlined. The default predicate is a loose
//! suffix match: any `src` value whose trailing characters are `svg`. That
//! also matches a name like `logo.notsvg`; set `strict_extension = true` to
//! require a real `.svg` extension on the URL path instead.
//!
//! # Example
//!
//! ```toml
//! [select]
//! suffix = "svg"
//! strict_extension = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Trailing characters a `src` value must end with.
    pub suffix: String,

    /// Require a `.svg` extension on the URL path instead of the suffix match.
    pub strict_extension: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            suffix: "svg".to_string(),
            strict_extension: false,
        }
    }
}

impl SelectConfig {
    /// Check whether a `src` value selects its image for inlining.
    pub fn matches(&self, src: &str) -> bool {
        if self.strict_extension {
            let path = src.split(['?', '#']).next().unwrap_or(src);
            Path::new(path)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        } else {
            src.ends_with(&self.suffix)
        }
    }

    /// Validate selection configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.suffix.is_empty() {
            diag.error_with_hint(
                FieldPath("select.suffix"),
                "empty suffix would select every image",
                "remove the key to use the default \"svg\"",
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
        assert_eq!(config.select.suffix, "svg");
        assert!(!config.select.strict_extension);
    }

    #[test]
    fn test_loose_suffix_match() {
        let select = SelectConfig::default();
        assert!(select.matches("icon.svg"));
        assert!(select.matches("/icons/icon.svg"));
        // Suffix match, not extension match
        assert!(select.matches("logo.notsvg"));
        assert!(!select.matches("icon.png"));
        // A query string defeats the suffix match
        assert!(!select.matches("icon.svg?v=2"));
    }

    #[test]
    fn test_strict_extension_match() {
        let select = SelectConfig {
            strict_extension: true,
            ..Default::default()
        };
        assert!(select.matches("icon.svg"));
        assert!(select.matches("icon.SVG"));
        assert!(select.matches("icon.svg?v=2"));
        assert!(!select.matches("logo.notsvg"));
        assert!(!select.matches("icon.png"));
    }

    #[test]
    fn test_custom_suffix() {
        let config = test_parse_config("[select]\nsuffix = \".svg\"");
        assert!(config.select.matches("icon.svg"));
        assert!(!config.select.matches("logo.notsvg"));
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let config = test_parse_config("[select]\nsuffix = \"\"");
        let mut diag = ConfigDiagnostics::new();
        config.select.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
