//! Configuration utility types.

mod error;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};

/// Dotted path of a config field (e.g. `fetch.concurrency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
