//! SELinux relabelling of the CUPS filter.
use std::path::Path;

use crate::exec::{CommandOpts, Executor, invoke};
use crate::logging::Log;

/// Location of `restorecon` on systems that keep it off the user `PATH`.
pub const FALLBACK_RESTORECON: &str = "/sbin/restorecon";

/// Resolve the `restorecon` program, if installed.
#[must_use]
pub fn restorecon(executor: &dyn Executor) -> Option<&'static str> {
    if executor.which("restorecon") {
        Some("restorecon")
    } else if Path::new(FALLBACK_RESTORECON).exists() {
        Some(FALLBACK_RESTORECON)
    } else {
        None
    }
}

/// Restore the default security context of `path`.
///
/// Print filters may end up with a context the print spooler cannot
/// execute. Failures are harmless and ignored. Returns whether the relabel
/// command was run.
#[must_use]
pub fn relabel(path: &Path, executor: &dyn Executor, log: &dyn Log) -> bool {
    let Some(program) = restorecon(executor) else {
        log.debug("restorecon not found, skipping relabel");
        return false;
    };
    let target = path.display().to_string();
    invoke(executor, log, program, &[&target], CommandOpts::TOLERANT);
    true
}
