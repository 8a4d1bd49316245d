//! SysV init scripts of dependent services.
use std::path::{Path, PathBuf};

use crate::exec::{CommandOpts, Executor, invoke};
use crate::logging::Log;

/// An init script that may or may not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    path: PathBuf,
}

impl InitScript {
    /// Script at `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Whether the script is installed.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Run the script with a single action. Failures are ignored.
    pub fn action(&self, action: &str, executor: &dyn Executor, log: &dyn Log) {
        invoke(
            executor,
            log,
            &self.path.display().to_string(),
            &[action],
            CommandOpts::TOLERANT,
        );
    }

    /// `restart` in one call.
    pub fn restart(&self, executor: &dyn Executor, log: &dyn Log) {
        self.action("restart", executor, log);
    }

    /// `stop` followed by `start`.
    pub fn stop_start(&self, executor: &dyn Executor, log: &dyn Log) {
        self.action("stop", executor, log);
        self.action("start", executor, log);
    }
}
