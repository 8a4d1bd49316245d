//! Icon, desktop-entry and MIME cache refresh.
use std::path::Path;

use crate::exec::{CommandOpts, Executor, invoke};
use crate::logging::Log;

/// One cache refresh command: program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheCommand {
    /// Program looked up on `PATH`.
    pub program: &'static str,
    /// Arguments, paths already resolved.
    pub args: Vec<String>,
}

/// Refresh commands for the data directory `datadir`.
#[must_use]
pub fn cache_commands(datadir: &Path) -> Vec<CacheCommand> {
    let path = |sub: &str| datadir.join(sub).display().to_string();
    vec![
        CacheCommand {
            program: "gtk-update-icon-cache",
            args: vec![
                "-q".to_string(),
                "-t".to_string(),
                "-f".to_string(),
                path("icons/hicolor"),
            ],
        },
        CacheCommand {
            program: "update-desktop-database",
            args: vec!["-q".to_string(), path("applications")],
        },
        CacheCommand {
            program: "update-mime-database",
            args: vec![path("mime")],
        },
    ]
}

/// Run every refresh command whose program is installed.
///
/// Failures are ignored. Returns the number of commands run.
#[must_use]
pub fn refresh(datadir: &Path, executor: &dyn Executor, log: &dyn Log) -> usize {
    let mut ran = 0;
    for cmd in cache_commands(datadir) {
        if !executor.which(cmd.program) {
            log.debug(&format!("{} not found, skipping", cmd.program));
            continue;
        }
        let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();
        invoke(executor, log, cmd.program, &args, CommandOpts::TOLERANT);
        ran += 1;
    }
    ran
}
