//! `[inject]` section configuration.
//!
//! UI-framework bootstrap injection: a script element carrying the
//! configured init statement is appended to each page body, so the
//! framework's setup entry point runs once when the page loads.
//!
//! # Example
//!
//! ```toml
//! [inject]
//! init = "$(document).foundation();"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectConfig {
    /// Framework initialization statement injected into each page body.
    /// Empty disables injection.
    pub init: String,
}

impl InjectConfig {
    /// Check whether injection is configured.
    pub fn enabled(&self) -> bool {
        !self.init.trim().is_empty()
    }
}
