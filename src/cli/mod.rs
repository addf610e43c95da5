//! Command-line interface module.

mod args;
mod build;
mod lint;

pub use args::{Cli, Commands};
pub use build::{build_all, run_task};
pub use lint::run_lint;

use crate::{asset, core::BuildContext};

/// Print `globs(suffix)`, one pattern per line.
pub fn print_globs(ctx: &BuildContext, suffix: &str) {
    for pattern in asset::globs(ctx.registry(), suffix) {
        println!("{pattern}");
    }
}
