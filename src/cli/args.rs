//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// inlay SVG inliner CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: inlay.toml)
    #[arg(short = 'C', long, default_value = "inlay.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inline SVG images into pages
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Report matching images without rewriting anything
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

/// Run command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Pages or directories to process. Defaults to the configured scan root.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Write rewritten pages under this directory instead of in place
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Framework init statement to inject into each page body
    #[arg(short, long)]
    pub init: Option<String>,

    /// Require a real `.svg` extension instead of the loose suffix match
    #[arg(short = 'x', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict_extension: Option<bool>,

    /// Allow fetching remote (http/https) image sources
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub remote: Option<bool>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Maximum concurrent fetches
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Pages or directories to check. Defaults to the configured scan root.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Verify remote sources by fetching them
    #[arg(short, long)]
    pub remote: bool,

    /// Require a real `.svg` extension instead of the loose suffix match
    #[arg(short = 'x', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict_extension: Option<bool>,

    /// Print the report as JSON
    #[arg(short = 'J', long)]
    pub json: bool,

    /// Treat problems as warnings (exit 0 even when found)
    #[arg(short = 'w', long)]
    pub warn_only: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run { .. })
    }
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }
}
