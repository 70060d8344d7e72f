//! `[scan]` section configuration.
//!
//! Where pages live and which files count as pages.
//!
//! # Example
//!
//! ```toml
//! [scan]
//! pages = "public"              # directory searched for pages
//! extensions = ["html", "htm"]  # files treated as pages
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory searched for pages (relative to the config file).
    pub pages: PathBuf,

    /// File extensions treated as pages (matched case-insensitively).
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pages: PathBuf::from("."),
            extensions: vec!["html".to_string(), "htm".to_string()],
        }
    }
}

impl ScanConfig {
    /// Validate scan configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                FieldPath("scan.extensions"),
                "no page extensions configured",
                "remove the key to use the default [\"html\", \"htm\"]",
            );
        }
        for ext in &self.extensions {
            if ext.starts_with('.') {
                diag.error_with_hint(
                    FieldPath("scan.extensions"),
                    format!("extension `{ext}` must not include the dot"),
                    format!("write \"{}\"", ext.trim_start_matches('.')),
                );
            }
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
        assert_eq!(config.scan.pages, PathBuf::from("."));
        assert_eq!(config.scan.extensions, ["html", "htm"]);
    }

    #[test]
    fn test_parsing() {
        let config = test_parse_config("[scan]\npages = \"public\"\nextensions = [\"html\"]");
        assert_eq!(config.scan.pages, PathBuf::from("public"));
        assert_eq!(config.scan.extensions, ["html"]);
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let config = test_parse_config("[scan]\nextensions = [\".html\"]");
        let mut diag = ConfigDiagnostics::new();
        config.scan.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let config = test_parse_config("[scan]\nextensions = []");
        let mut diag = ConfigDiagnostics::new();
        config.scan.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
