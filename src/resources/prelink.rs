//! Prelink exclusion for the shared launcher binary.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::helpers::fs::write_atomic;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::logging::Log;

/// Comment placed above the exclusion rule.
pub const PRELINK_COMMENT: &str = "# appLoader will segfault if prelinked.";

/// Keeps prelink away from the launcher, which crashes once prelinked.
pub struct PrelinkExclusion<'a> {
    conf: PathBuf,
    rule: String,
    log: &'a dyn Log,
}

impl std::fmt::Debug for PrelinkExclusion<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrelinkExclusion")
            .field("conf", &self.conf)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

impl<'a> PrelinkExclusion<'a> {
    /// Exclude `app_loader` in the prelink configuration file `conf`.
    #[must_use]
    pub fn new(conf: PathBuf, app_loader: &Path, log: &'a dyn Log) -> Self {
        Self {
            conf,
            rule: format!("-b {}", app_loader.display()),
            log,
        }
    }

    /// The two managed lines: comment then rule.
    #[must_use]
    pub fn lines(&self) -> [&str; 2] {
        [PRELINK_COMMENT, &self.rule]
    }

    /// Current lines with trailing whitespace stripped, or `None` when the
    /// configuration file does not exist.
    fn read_lines(&self) -> Result<Option<Vec<String>>> {
        if !self.conf.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.conf)
            .with_context(|| format!("read {}", self.conf.display()))?;
        Ok(Some(text.lines().map(|l| l.trim_end().to_string()).collect()))
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut text = lines.join("\n");
        if !lines.is_empty() {
            text.push('\n');
        }
        write_atomic(&self.conf, text.as_bytes())
    }

    fn not_present() -> ResourceChange {
        ResourceChange::Skipped {
            reason: "prelink not present".to_string(),
        }
    }
}

impl Applicable for PrelinkExclusion<'_> {
    fn description(&self) -> String {
        format!("{} in {}", self.rule, self.conf.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let Some(mut lines) = self.read_lines()? else {
            self.log.info("Prelink not present, skipping configuration.");
            return Ok(Self::not_present());
        };
        if lines.iter().any(|l| *l == self.rule) {
            self.log.warn("appLoader skip prelinking already present.");
            return Ok(ResourceChange::AlreadyCorrect);
        }
        lines.extend(self.lines().iter().map(|l| (*l).to_string()));
        self.write_lines(&lines)?;
        self.log.info(&format!(
            "Added appLoader prelink exclusion to {}.",
            self.conf.display()
        ));
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        let Some(mut lines) = self.read_lines()? else {
            self.log.info("Prelink not present, skipping configuration.");
            return Ok(Self::not_present());
        };
        let mut found = false;
        for managed in self.lines() {
            if let Some(pos) = lines.iter().position(|l| l == managed) {
                lines.remove(pos);
                found = true;
            }
        }
        if !found {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.write_lines(&lines)?;
        self.log.info(&format!(
            "Removed appLoader prelink exclusion from {}.",
            self.conf.display()
        ));
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PrelinkExclusion<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        match self.read_lines()? {
            None => Ok(ResourceState::Invalid {
                reason: "prelink not present".to_string(),
            }),
            Some(lines) if lines.iter().any(|l| *l == self.rule) => Ok(ResourceState::Correct),
            Some(_) => Ok(ResourceState::Missing),
        }
    }
}
