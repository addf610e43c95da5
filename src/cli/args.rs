//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// assetpipe CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Manifest path (default: assetpipe.toml, falls back to package.json)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Run in production mode (minify, collapse whitespace, compress images)
    #[arg(short, long, global = true)]
    pub release: bool,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile stylesheets
    #[command(visible_alias = "css")]
    Styles,

    /// Compile scripts
    #[command(visible_alias = "js")]
    Scripts,

    /// Compile HTML and EJS templates
    #[command(visible_alias = "html")]
    Markup,

    /// Compress images
    Images,

    /// Copy fonts and icons
    Misc,

    /// Report syntax errors in every package's scripts
    Lint,

    /// Run every asset task
    #[command(visible_alias = "b")]
    Build,

    /// Run every asset task in production mode
    #[command(visible_alias = "d")]
    Dist,

    /// Print the per-package glob patterns for a suffix
    Globs {
        /// Suffix appended to each `<package>/assets` root (e.g. `/**/*.js`)
        suffix: Option<String>,
    },
}

impl Commands {
    pub const fn is_dist(&self) -> bool {
        matches!(self, Self::Dist)
    }
}
