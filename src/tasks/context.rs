use std::sync::Arc;

use crate::config::InstallerConfig;
use crate::config::layout::Layout;
use crate::exec::Executor;
use crate::logging::Log;

/// Versions and mode of the transaction a phase runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Version being replaced, if any.
    pub old: Option<String>,
    /// Version being installed, if any.
    pub new: Option<String>,
    /// Whether this phase is part of an upgrade.
    pub upgrade: bool,
}

/// Shared context for one lifecycle phase.
pub struct Context {
    /// Typed configuration, loaded once per phase.
    pub config: Arc<InstallerConfig>,
    /// Resolved filesystem layout.
    pub layout: Arc<Layout>,
    /// Logger for output and step recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// The transaction this phase belongs to.
    pub transaction: Transaction,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("transaction", &self.transaction)
            .finish()
    }
}

impl Context {
    /// Creates a new context for one lifecycle phase.
    #[must_use]
    pub fn new(
        config: Arc<InstallerConfig>,
        layout: Arc<Layout>,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        transaction: Transaction,
    ) -> Self {
        Self {
            config,
            layout,
            log,
            executor,
            transaction,
        }
    }

    /// Whether this phase is part of an upgrade.
    #[must_use]
    pub const fn upgrading(&self) -> bool {
        self.transaction.upgrade
    }

    /// Whether configuration must be preserved by this uninstall.
    #[must_use]
    pub fn keeps_config(&self) -> bool {
        self.upgrading() || self.config.installer.keep_config_on_uninstall
    }
}
