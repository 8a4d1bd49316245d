//! Command: run one side-effecting lifecycle phase.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, TransactionOpts};
use crate::error::InstallerError;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context, Phase};

/// Run `phase` against the live system.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a required step
/// fails. Failures of best-effort steps are only reported in the summary.
pub fn run(
    global: &GlobalOpts,
    phase: Phase,
    opts: &TransactionOpts,
    log: &Arc<Logger>,
) -> Result<()> {
    let setup = CommandSetup::init(global, log.as_ref())?;
    let ctx = setup.into_context(
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
        opts.transaction(),
    );
    run_with(phase, &ctx, log)
}

/// Run `phase` with a prepared context and print the summary.
///
/// # Errors
///
/// Returns the required-step failure, if any.
pub fn run_with(phase: Phase, ctx: &Context, log: &Logger) -> Result<()> {
    let t = &ctx.transaction;
    log.info(&format!(
        "{phase}: {} -> {}{}",
        t.old.as_deref().unwrap_or("none"),
        t.new.as_deref().unwrap_or("none"),
        if t.upgrade { " (upgrade)" } else { "" }
    ));

    let result = tasks::run_phase(phase, ctx);
    log.print_summary();
    result.map_err(|e| InstallerError::from(e).into())
}
