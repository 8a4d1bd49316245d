//! Top-level subcommand orchestration.
pub mod detect;
pub mod phase;
pub mod plan;
pub mod sentinel;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::InstallerConfig;
use crate::config::layout::Layout;
use crate::error::InstallerError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::tasks::{Context, Transaction};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates configuration loading, command-line overrides and layout
/// resolution so that each command does not have to repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Typed configuration with overrides applied.
    pub config: InstallerConfig,
    /// Layout resolved from the configured roots.
    pub layout: Layout,
}

impl CommandSetup {
    /// Load the configuration, apply command-line overrides and resolve the
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let config = InstallerConfig::load(&global.config).map_err(InstallerError::from)?;
        if global.config.exists() {
            log.debug(&format!("config: {}", global.config.display()));
        } else {
            log.debug(&format!(
                "config: {} not found, using defaults",
                global.config.display()
            ));
        }
        Ok(Self::with_overrides(config, global, log))
    }

    fn with_overrides(mut config: InstallerConfig, global: &GlobalOpts, log: &dyn Log) -> Self {
        if let Some(prefix) = &global.prefix {
            config.paths.prefix.clone_from(prefix);
        }
        if let Some(sysconfdir) = &global.sysconfdir {
            config.paths.sysconfdir.clone_from(sysconfdir);
        }
        if let Some(component_dir) = &global.component_dir {
            config.paths.component_dir.clone_from(component_dir);
        }

        let layout = Layout::resolve(&config.paths);
        log.debug(&format!("prefix: {}", layout.prefix.display()));
        log.debug(&format!("application dir: {}", layout.dest.display()));
        log.debug(&format!("cups dir: {}", layout.cupslibdir.display()));
        match &layout.initscriptdir {
            Some(dir) => log.debug(&format!("init scripts: {}", dir.display())),
            None => log.debug("init scripts: none"),
        }

        Self { config, layout }
    }

    /// Build the task context for one lifecycle phase.
    #[must_use]
    pub fn into_context(
        self,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        transaction: Transaction,
    ) -> Context {
        Context::new(
            Arc::new(self.config),
            Arc::new(self.layout),
            log,
            executor,
            transaction,
        )
    }
}
