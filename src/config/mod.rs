//! Configuration management for `inlay.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── scan       # [scan]    page discovery
//! │   ├── select     # [select]  image selection predicate
//! │   ├── fetch      # [fetch]   transport settings
//! │   ├── svg        # [svg]     SVG cleanup settings
//! │   └── inject     # [inject]  framework bootstrap injection
//! ├── types/         # Utility types
//! │   └── error      # ConfigError, ConfigDiagnostics
//! └── mod.rs         # InlayConfig (this file)
//! ```
//!
//! The config file is optional: without one, defaults apply and the project
//! root is the working directory. CLI flags override file values.

pub mod section;
pub mod types;

pub use section::{FetchConfig, InjectConfig, ScanConfig, SelectConfig, SvgConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing inlay.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlayConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Page discovery settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Image selection predicate
    #[serde(default)]
    pub select: SelectConfig,

    /// Transport settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// SVG cleanup settings
    #[serde(default)]
    pub svg: SvgConfig,

    /// Framework bootstrap injection
    #[serde(default)]
    pub inject: InjectConfig,
}

impl Default for InlayConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            scan: ScanConfig::default(),
            select: SelectConfig::default(),
            fetch: FetchConfig::default(),
            svg: SvgConfig::default(),
            inject: InjectConfig::default(),
        }
    }
}

impl InlayConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; a missing file is
    /// not an error (defaults apply, root = cwd).
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = resolve_config_path(&cli.config)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.cli = Some(cli);
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML, collecting unknown fields instead of failing on them.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Merge CLI options into the loaded configuration.
    fn apply_cli(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Run { args } => {
                if let Some(strict) = args.strict_extension {
                    self.select.strict_extension = strict;
                }
                if let Some(remote) = args.remote {
                    self.fetch.remote = remote;
                }
                if let Some(timeout) = args.timeout {
                    self.fetch.timeout = timeout;
                }
                if let Some(jobs) = args.jobs {
                    self.fetch.concurrency = jobs;
                }
                if let Some(init) = &args.init {
                    init.clone_into(&mut self.inject.init);
                }
                crate::logger::set_verbose(args.verbose);
            }
            Commands::Check { args } => {
                if let Some(strict) = args.strict_extension {
                    self.select.strict_extension = strict;
                }
                crate::logger::set_verbose(args.verbose);
            }
        }
    }

    /// Run section validators, failing on collected diagnostics.
    fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.scan.validate(&mut diag);
        self.select.validate(&mut diag);
        self.fetch.validate(&mut diag);
        self.svg.validate(&mut diag);
        diag.into_result()
            .map_err(|d| ConfigError::Diagnostics(d).into())
    }

    /// Directory searched for pages; also the site root for `/...` sources.
    pub fn pages_dir(&self) -> PathBuf {
        if self.scan.pages.is_absolute() {
            self.scan.pages.clone()
        } else {
            self.root.join(&self.scan.pages)
        }
    }
}

/// Resolve the config file location: absolute path as-is, otherwise walk up
/// from cwd. Returns the path and whether it exists.
fn resolve_config_path(config_name: &Path) -> Result<(PathBuf, bool)> {
    if config_name.is_absolute() {
        return Ok((config_name.to_path_buf(), config_name.exists()));
    }

    let cwd = std::env::current_dir()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Ok((candidate, true));
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Ok((cwd.join(config_name), false)),
        }
    }
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}

/// Parse a config snippet for section tests.
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> InlayConfig {
    InlayConfig::from_str(content).expect("test config should parse")
}
