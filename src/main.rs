//! inlay - inline SVG post-processor for generated HTML sites.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod dom;
mod fetch;
mod logger;
mod pipeline;
mod svg;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::InlayConfig;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = InlayConfig::load(cli)?;

    match &cli.command {
        Commands::Run { args } => cli::run::run_pages(args, &config),
        Commands::Check { args } => cli::check::check_pages(args, &config),
    }
}
