//! `[fetch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [fetch]
//! remote = true       # allow http(s) image sources
//! timeout = 10        # per-request timeout in seconds
//! concurrency = 8     # maximum in-flight fetches
//! user_agent = "inlay/0.1.0"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Allow fetching remote (http/https) image sources.
    pub remote: bool,

    /// Per-request timeout in seconds.
    pub timeout: u64,

    /// Maximum number of in-flight fetches.
    pub concurrency: usize,

    /// User-Agent header for remote requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            remote: true,
            timeout: 10,
            concurrency: 8,
            user_agent: concat!("inlay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Validate fetch configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.concurrency == 0 {
            diag.error_with_hint(
                FieldPath("fetch.concurrency"),
                "must be at least 1",
                "remove the key to use the default (8)",
            );
        }
        if self.timeout == 0 {
            diag.error_with_hint(
                FieldPath("fetch.timeout"),
                "must be at least 1 second",
                "remove the key to use the default (10)",
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
        assert!(config.fetch.remote);
        assert_eq!(config.fetch.timeout, 10);
        assert_eq!(config.fetch.concurrency, 8);
        assert!(config.fetch.user_agent.starts_with("inlay/"));
    }

    #[test]
    fn test_parsing() {
        let config = test_parse_config("[fetch]\nremote = false\nconcurrency = 2");
        assert!(!config.fetch.remote);
        assert_eq!(config.fetch.concurrency, 2);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = test_parse_config("[fetch]\nconcurrency = 0");
        let mut diag = ConfigDiagnostics::new();
        config.fetch.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = test_parse_config("[fetch]\ntimeout = 0");
        let mut diag = ConfigDiagnostics::new();
        config.fetch.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
