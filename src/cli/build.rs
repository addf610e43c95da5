//! Asset task commands.
//!
//! `build`/`dist` run every task in a fixed order:
//! markup -> scripts -> styles -> images -> misc.
//! A failing task is reported and the remaining tasks still run; the command
//! fails once all of them have finished.

use anyhow::{Result, anyhow};

use crate::{
    asset::{self, TaskReport},
    core::BuildContext,
    debug, log,
    pipeline::AssetKind,
    utils::plural_count,
};

/// Run a single asset task.
pub fn run_task(kind: AssetKind, ctx: &BuildContext) -> Result<TaskReport> {
    let report = asset::iterate(kind, ctx).map_err(|e| {
        log!("error"; "{}: {:#}", kind.name(), anyhow!(e));
        anyhow!("{} failed", kind.name())
    })?;

    for location in &report.locations {
        debug!(kind.name(); "{}: {}", location.key, plural_count(location.written.len(), "file"));
    }
    log!(report.kind.name(); "{} ({})", plural_count(report.total(), "file"), ctx.mode().name());
    Ok(report)
}

/// Run every asset task, continuing past failures.
pub fn build_all(ctx: &BuildContext) -> Result<()> {
    let mut total = 0;
    let failed: Vec<_> = AssetKind::ALL
        .into_iter()
        .filter(|&kind| match run_task(kind, ctx) {
            Ok(report) => {
                total += report.total();
                false
            }
            Err(_) => true,
        })
        .map(AssetKind::name)
        .collect();

    if !failed.is_empty() {
        anyhow::bail!("build failed: {}", failed.join(", "));
    }
    log!("done"; "{} in {} mode", plural_count(total, "file"), ctx.mode().name());
    Ok(())
}
