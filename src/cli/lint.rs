//! `lint` command.

use anyhow::{Result, anyhow};

use crate::{core::BuildContext, lint, log, utils::{display_relative, plural_count}};

/// Lint every package's scripts, failing when anything is reported.
pub fn run_lint(ctx: &BuildContext) -> Result<()> {
    let report = lint::run(ctx).map_err(|e| anyhow!(e).context("lint failed"))?;

    for d in &report.diagnostics {
        log!("lint"; "{}:{}:{}: {}", display_relative(&d.path, ctx.root()), d.line, d.column, d.message);
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} in {}",
            plural_count(report.diagnostics.len(), "problem"),
            plural_count(report.files, "file")
        );
    }
    log!("done"; "{} checked, no problems", plural_count(report.files, "file"));
    Ok(())
}
