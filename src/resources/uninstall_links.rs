//! Legacy uninstaller compatibility links.
//!
//! Older product installers look for `vmware-uninstall` and
//! `vmware/installer.sh` to remove a previous installation. Both are pointed
//! at the downgrade uninstaller of the installed version, and an empty
//! `locations` database sits next to `installer.sh`.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::layout::Layout;

/// Contents of the legacy `locations` marker file.
pub const LOCATIONS_CONTENT: &str = "# Empty locations file to catch downgrade\n# to WS 6.0\n";

/// File name of the downgrade uninstaller inside the installer directory.
pub const DOWNGRADE_UNINSTALLER: &str = "vmware-uninstall-downgrade";

/// The link pair plus marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallLinks {
    target: PathBuf,
    links: [PathBuf; 2],
    locations: PathBuf,
}

impl UninstallLinks {
    /// Links for the installer of `version` under `layout`.
    #[must_use]
    pub fn new(layout: &Layout, version: &str) -> Self {
        let vmware_etc = layout.sysconfdir.join("vmware");
        Self {
            target: layout.installer_dir(version).join(DOWNGRADE_UNINSTALLER),
            links: [
                layout.bindir.join("vmware-uninstall"),
                vmware_etc.join("installer.sh"),
            ],
            locations: vmware_etc.join("locations"),
        }
    }

    /// Link paths, in creation order.
    #[must_use]
    pub const fn links(&self) -> &[PathBuf] {
        &self.links
    }

    /// Path the links point at.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of the marker file.
    #[must_use]
    pub fn locations(&self) -> &Path {
        &self.locations
    }
}

/// Remove a file or symlink, refusing to touch a directory.
fn clear(path: &Path) -> Result<bool> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(false);
    };
    if meta.is_dir() {
        return Err(ResourceError::InvalidState {
            resource: path.display().to_string(),
            reason: "is a directory".to_string(),
        }
        .into());
    }
    remove_existing(path)?;
    Ok(true)
}

impl Applicable for UninstallLinks {
    fn description(&self) -> String {
        format!("uninstaller links -> {}", self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.current_state()? == ResourceState::Correct {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        for link in &self.links {
            clear(link)?;
            ensure_parent_dir(link)?;
            std::os::unix::fs::symlink(&self.target, link).with_context(|| {
                format!("link {} -> {}", link.display(), self.target.display())
            })?;
        }
        clear(&self.locations)?;
        std::fs::write(&self.locations, LOCATIONS_CONTENT)
            .with_context(|| format!("write {}", self.locations.display()))?;
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        let mut removed = false;
        for path in self.links.iter().chain(std::iter::once(&self.locations)) {
            removed |= clear(path)?;
        }
        Ok(if removed {
            ResourceChange::Applied
        } else {
            ResourceChange::AlreadyCorrect
        })
    }
}

impl Resource for UninstallLinks {
    fn current_state(&self) -> Result<ResourceState> {
        let mut any = false;
        for link in &self.links {
            match std::fs::read_link(link) {
                Ok(dest) if dest == self.target => any = true,
                Ok(dest) => {
                    return Ok(ResourceState::Incorrect {
                        current: dest.display().to_string(),
                    });
                }
                Err(_) if link.symlink_metadata().is_ok() => {
                    return Ok(ResourceState::Incorrect {
                        current: format!("{} is not a symlink", link.display()),
                    });
                }
                Err(_) => {}
            }
        }
        let marker = std::fs::read_to_string(&self.locations).ok();
        Ok(match (any, marker.as_deref()) {
            (false, None) => ResourceState::Missing,
            (_, Some(LOCATIONS_CONTENT))
                if self.links.iter().all(|l| l.symlink_metadata().is_ok()) =>
            {
                ResourceState::Correct
            }
            _ => ResourceState::Incorrect {
                current: "partially installed".to_string(),
            },
        })
    }
}
