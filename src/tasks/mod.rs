//! Named lifecycle steps and the phases that run them in a fixed order.
pub mod desktop;
pub mod disks;
pub mod help_text;
mod helpers;
pub mod networking;
pub mod processes;
pub mod services;
pub mod settings;
pub mod uninstall_links;

mod context;

pub use context::{Context, Transaction};

use std::fmt;

use anyhow::Result;

use crate::error::LifecycleError;
use crate::logging::TaskStatus;

/// Outcome of a step that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// The step completed.
    Ok,
    /// The step had nothing to do on this system.
    Skipped(String),
}

/// A named, executable lifecycle step.
pub trait Task: Send + Sync {
    /// Human-readable step name.
    fn name(&self) -> &'static str;

    /// Whether a failure of this step aborts the phase.
    ///
    /// Every other step is best-effort: its failure is logged and recorded
    /// and the phase continues.
    fn required(&self) -> bool {
        false
    }

    /// Whether this step applies to the current transaction.
    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    /// Execute the step.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails, such as when a file cannot be
    /// rewritten or a required command reports failure.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Lifecycle phases that perform side effects.
///
/// The declarative phases (questions and the install plan) produce data
/// instead and live in [`crate::config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the transaction starts.
    PreTransactionInstall,
    /// Before files are staged.
    PreInstall,
    /// After files were staged successfully.
    PostInstall,
    /// Guard before an uninstall proceeds.
    InitializeUninstall,
    /// Before files are removed.
    PreUninstall,
    /// After files were removed.
    PostUninstall,
}

impl Phase {
    /// Every phase, in transaction order.
    pub const ALL: [Self; 6] = [
        Self::PreTransactionInstall,
        Self::PreInstall,
        Self::PostInstall,
        Self::InitializeUninstall,
        Self::PreUninstall,
        Self::PostUninstall,
    ];

    /// Command-line name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreTransactionInstall => "pre-transaction-install",
            Self::PreInstall => "pre-install",
            Self::PostInstall => "post-install",
            Self::InitializeUninstall => "initialize-uninstall",
            Self::PreUninstall => "pre-uninstall",
            Self::PostUninstall => "post-uninstall",
        }
    }

    /// Steps of this phase, in execution order.
    #[must_use]
    pub fn tasks(self) -> Vec<Box<dyn Task>> {
        match self {
            Self::PreTransactionInstall => vec![Box::new(help_text::CheckHelpText)],
            Self::PreInstall => vec![Box::new(processes::StopProductProcesses)],
            Self::PostInstall => vec![
                Box::new(settings::WriteSettings),
                Box::new(desktop::BindLauncher),
                Box::new(desktop::ConfigureUrlHandlers),
                Box::new(desktop::ConfigurePrelink),
                Box::new(desktop::RefreshDesktopCaches),
                Box::new(services::RelabelPrintFilter),
                Box::new(services::RestartPrintService),
                Box::new(services::RestartProductService),
                Box::new(uninstall_links::AddUninstallLinks),
            ],
            Self::InitializeUninstall => vec![Box::new(disks::UnmountVirtualDisks)],
            // Handlers go before the settings they read; processes go last.
            Self::PreUninstall => vec![
                Box::new(desktop::DeconfigureUrlHandlers),
                Box::new(desktop::DeconfigurePrelink),
                Box::new(settings::RemoveSettings),
                Box::new(processes::StopProductProcesses),
            ],
            Self::PostUninstall => vec![
                Box::new(networking::RemoveNetworkConfig),
                Box::new(networking::RemoveNetworkBackups),
                Box::new(networking::RemoveVmnetState),
                Box::new(uninstall_links::RemoveUninstallLinks),
            ],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execute a step, recording the result in the logger.
///
/// # Errors
///
/// Returns an error only when a required step fails.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<(), LifecycleError> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping step: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            if !task.required() {
                ctx.log.error(&format!("{}: {e:#}", task.name()));
                return Ok(());
            }
            Err(match e.downcast::<LifecycleError>() {
                Ok(lifecycle) => lifecycle,
                Err(other) => LifecycleError::RequiredStepFailed {
                    step: task.name().to_string(),
                    reason: format!("{other:#}"),
                },
            })
        }
    }
}

/// Run every step of `phase` in order.
///
/// # Errors
///
/// Returns the first required-step failure; later steps do not run.
pub fn run_phase(phase: Phase, ctx: &Context) -> Result<(), LifecycleError> {
    ctx.log.debug(&format!("phase: {phase}"));
    for task in phase.tasks() {
        execute(task.as_ref(), ctx)?;
    }
    Ok(())
}

/// Shared helpers for task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::path::Path;
    use std::sync::Arc;

    use crate::config::layout::Layout;
    use crate::config::{InstallerConfig, Paths};
    use crate::logging::Logger;

    use super::{Context, Transaction};

    pub use crate::resources::test_helpers::RecordingExecutor;

    /// Configuration rooted at a path that does not exist, so probes of the
    /// filesystem find nothing.
    #[must_use]
    pub fn test_config() -> InstallerConfig {
        rooted_config(Path::new("/nonexistent/player-test"))
    }

    /// Configuration whose prefix and sysconfdir live under `root`.
    #[must_use]
    pub fn rooted_config(root: &Path) -> InstallerConfig {
        InstallerConfig {
            paths: Paths {
                prefix: root.join("usr"),
                sysconfdir: root.join("etc"),
                localstatedir: root.join("var"),
                initscriptdir: None,
                component_dir: root.join("component"),
            },
            ..InstallerConfig::default()
        }
    }

    /// Build a [`Context`] around a fresh [`RecordingExecutor`].
    #[must_use]
    pub fn make_context(
        config: InstallerConfig,
        transaction: Transaction,
    ) -> (Context, Arc<RecordingExecutor>) {
        make_context_with(config, transaction, RecordingExecutor::new())
    }

    /// Build a [`Context`] around the given executor.
    #[must_use]
    pub fn make_context_with(
        config: InstallerConfig,
        transaction: Transaction,
        executor: RecordingExecutor,
    ) -> (Context, Arc<RecordingExecutor>) {
        let executor = Arc::new(executor);
        let layout = Layout::resolve(&config.paths);
        let ctx = Context::new(
            Arc::new(config),
            Arc::new(layout),
            Arc::new(Logger::new("test")),
            Arc::clone(&executor) as Arc<dyn crate::exec::Executor>,
            transaction,
        );
        (ctx, executor)
    }
}
