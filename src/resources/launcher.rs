//! Desktop launcher binary binding.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::write_atomic;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Placeholder shipped in the launcher entry.
pub const BINARY_PLACEHOLDER: &str = "@@BINARY@@";

/// Points the desktop launcher entry at the installed binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherBinding {
    entry: PathBuf,
    binary: PathBuf,
}

impl LauncherBinding {
    /// Bind the desktop entry at `entry` to `binary`.
    #[must_use]
    pub fn new(entry: PathBuf, binary: &Path) -> Self {
        Self {
            entry,
            binary: binary.to_path_buf(),
        }
    }

    fn read(&self) -> Result<Option<String>> {
        if !self.entry.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.entry)
            .map(Some)
            .with_context(|| format!("read {}", self.entry.display()))
    }
}

impl Applicable for LauncherBinding {
    fn description(&self) -> String {
        format!("{} -> {}", self.entry.display(), self.binary.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let Some(text) = self.read()? else {
            return Ok(ResourceChange::Skipped {
                reason: format!("{} not installed", self.entry.display()),
            });
        };
        if !text.contains(BINARY_PLACEHOLDER) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        let bound = text.replace(BINARY_PLACEHOLDER, &self.binary.display().to_string());
        write_atomic(&self.entry, bound.as_bytes())?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LauncherBinding {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(match self.read()? {
            None => ResourceState::Invalid {
                reason: "launcher entry not installed".to_string(),
            },
            Some(text) if text.contains(BINARY_PLACEHOLDER) => ResourceState::Incorrect {
                current: BINARY_PLACEHOLDER.to_string(),
            },
            Some(_) => ResourceState::Correct,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const ENTRY: &str = "[Desktop Entry]\nExec=@@BINARY@@ %U\nTryExec=@@BINARY@@\n";

    #[test]
    fn apply_replaces_every_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("vmware-player.desktop");
        std::fs::write(&entry, ENTRY).unwrap();
        let binding = LauncherBinding::new(entry.clone(), Path::new("/usr/bin/vmplayer"));

        assert!(binding.needs_change().unwrap());
        assert_eq!(binding.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(
            std::fs::read_to_string(&entry).unwrap(),
            "[Desktop Entry]\nExec=/usr/bin/vmplayer %U\nTryExec=/usr/bin/vmplayer\n"
        );
        assert_eq!(binding.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(binding.apply().unwrap(), ResourceChange::AlreadyCorrect);
    }

    #[test]
    fn missing_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("vmware-player.desktop");
        let binding = LauncherBinding::new(entry.clone(), Path::new("/usr/bin/vmplayer"));
        assert!(matches!(binding.apply().unwrap(), ResourceChange::Skipped { .. }));
        assert!(!binding.needs_change().unwrap());
        assert!(!entry.exists());
    }
}
