//! Virtual disk mount helper.
use std::path::{Path, PathBuf};

use crate::error::LifecycleError;
use crate::exec::{CommandOpts, ExecResult, Executor, invoke};
use crate::logging::Log;

/// Exit status of a program the loader could not link or start.
const NOT_RUNNABLE: i32 = 127;

/// The setuid helper that mounts virtual disks on the host.
pub struct MountHelper<'a> {
    path: PathBuf,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl std::fmt::Debug for MountHelper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHelper")
            .field("path", &self.path)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<'a> MountHelper<'a> {
    /// Helper binary at `path`.
    #[must_use]
    pub fn new(path: &Path, executor: &'a dyn Executor, log: &'a dyn Log) -> Self {
        Self {
            path: path.to_path_buf(),
            executor,
            log,
        }
    }

    fn call(&self, args: &[&str]) -> Option<ExecResult> {
        invoke(
            self.executor,
            self.log,
            &self.path.display().to_string(),
            args,
            CommandOpts::QUIET,
        )
    }

    /// Whether the helper exists and actually works.
    ///
    /// The binary may be present while its FUSE library is missing; a failed
    /// listing would then look like mounted disks, so `-L` must succeed too.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.path.exists()
            && self.call(&[]).is_some_and(|r| r.code != Some(NOT_RUNNABLE))
            && self.call(&["-L"]).is_some_and(|r| r.success)
    }

    /// Unmount every virtual disk.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::DisksStillMounted`] if any disk stays mounted.
    pub fn unmount_all(&self) -> Result<(), LifecycleError> {
        match self.call(&["-X"]) {
            Some(r) if r.success => {
                self.log.info("All virtual disks were unmounted successfully");
                Ok(())
            }
            other => {
                self.log.error("Some virtual disks were unable to be unmounted");
                Err(LifecycleError::DisksStillMounted {
                    exit_code: other.map_or(-1, |r| r.exit_code()),
                })
            }
        }
    }
}
