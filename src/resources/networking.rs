//! Virtual network configuration left behind in the product config directory.
use anyhow::{Context as _, Result};
use std::io;
use std::path::{Path, PathBuf};

use crate::logging::Log;

/// Highest virtual network adapter number.
pub const MAX_VMNET: u16 = 255;

/// Leftover network state under one product configuration directory.
pub struct NetworkingState<'a> {
    etcdir: PathBuf,
    log: &'a dyn Log,
}

impl std::fmt::Debug for NetworkingState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkingState")
            .field("etcdir", &self.etcdir)
            .finish_non_exhaustive()
    }
}

impl<'a> NetworkingState<'a> {
    /// State under `etcdir`.
    #[must_use]
    pub fn new(etcdir: &Path, log: &'a dyn Log) -> Self {
        Self {
            etcdir: etcdir.to_path_buf(),
            log,
        }
    }

    /// The network configuration database.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.etcdir.join("networking")
    }

    /// Remove the network configuration database.
    ///
    /// Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove_config(&self) -> Result<bool> {
        let path = self.config_file();
        if path.symlink_metadata().is_err() {
            return Ok(false);
        }
        std::fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        self.log.debug(&format!("removed {}", path.display()));
        Ok(true)
    }

    /// Remove every `networking.bak*` backup.
    ///
    /// A backup that cannot be removed is logged and skipped. Returns the
    /// number of backups removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the glob pattern is invalid.
    pub fn remove_backups(&self) -> Result<usize> {
        self.remove_backups_with(remove_file)
    }

    fn remove_backups_with(&self, remove: impl Fn(&Path) -> io::Result<()>) -> Result<usize> {
        let pattern = format!(
            "{}/networking.bak*",
            glob::Pattern::escape(&self.etcdir.display().to_string())
        );
        let mut removed = 0;
        for entry in glob::glob(&pattern).context("invalid backup pattern")? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    self.log
                        .warn(&format!("cannot read {}: {}", e.path().display(), e.error()));
                    continue;
                }
            };
            if path.is_dir() {
                continue;
            }
            if self.try_remove(&path, &remove) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove the per-adapter state directories `vmnet0` through `vmnet255`.
    ///
    /// The whole range is always swept; a directory that cannot be removed
    /// is logged and left behind. Returns the number of directories removed.
    #[must_use]
    pub fn remove_vmnet_dirs(&self) -> usize {
        self.remove_vmnet_dirs_with(remove_dir)
    }

    fn remove_vmnet_dirs_with(&self, remove: impl Fn(&Path) -> io::Result<()>) -> usize {
        let removed = (0..=MAX_VMNET)
            .map(|n| self.etcdir.join(format!("vmnet{n}")))
            .filter(|dir| dir.is_dir())
            .filter(|dir| self.try_remove(dir, &remove))
            .count();
        if removed > 0 {
            self.log
                .debug(&format!("removed {removed} vmnet state directories"));
        }
        removed
    }

    fn try_remove(&self, path: &Path, remove: impl Fn(&Path) -> io::Result<()>) -> bool {
        match remove(path) {
            Ok(()) => {
                self.log.debug(&format!("removed {}", path.display()));
                true
            }
            Err(e) => {
                self.log
                    .warn(&format!("cannot remove {}: {e}", path.display()));
                false
            }
        }
    }
}

fn remove_file(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}

fn remove_dir(path: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(path)
}
