//! Command: print the detected distribution.
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Log;
use crate::platform;

/// Nullable `(name, version, variant)` triple as printed by `detect-system`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemTriple {
    /// Distribution name.
    pub name: Option<String>,
    /// Release version.
    pub version: Option<String>,
    /// Edition, empty where not applicable.
    pub variant: Option<String>,
}

/// Identify the system from the release files under `etc_dir`.
#[must_use]
pub fn system_triple(etc_dir: &Path, log: &dyn Log) -> SystemTriple {
    let (name, version, variant) = platform::detect(etc_dir, log).triple();
    SystemTriple {
        name,
        version,
        variant,
    }
}

/// Print the detected distribution as JSON.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let triple = system_triple(&setup.layout.sysconfdir, log);
    println!(
        "{}",
        serde_json::to_string_pretty(&triple).context("serialize system identity")?
    );
    Ok(())
}
