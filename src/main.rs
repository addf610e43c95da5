//! assetpipe - per-package asset pipelines.

mod asset;
mod cli;
mod config;
mod core;
mod lint;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;
use core::BuildContext;
use pipeline::AssetKind;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Manifest errors are fatal before any task runs
    let config = ProjectConfig::load(&cli)?;
    let mut ctx = BuildContext::new(&config);
    if cli.release || cli.command.is_dist() {
        ctx = ctx.production();
    }

    match &cli.command {
        Commands::Styles => cli::run_task(AssetKind::Style, &ctx).map(|_| ()),
        Commands::Scripts => cli::run_task(AssetKind::Script, &ctx).map(|_| ()),
        Commands::Markup => cli::run_task(AssetKind::Markup, &ctx).map(|_| ()),
        Commands::Images => cli::run_task(AssetKind::Image, &ctx).map(|_| ()),
        Commands::Misc => cli::run_task(AssetKind::Misc, &ctx).map(|_| ()),
        Commands::Lint => cli::run_lint(&ctx),
        Commands::Build | Commands::Dist => cli::build_all(&ctx),
        Commands::Globs { suffix } => {
            cli::print_globs(&ctx, suffix.as_deref().unwrap_or_default());
            Ok(())
        }
    }
}
