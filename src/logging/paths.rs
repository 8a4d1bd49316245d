//! Where the per-phase log files live.
use std::fs;
use std::path::PathBuf;

/// Return the `$XDG_CACHE_HOME/player-app-installer/` directory, creating it if needed.
///
/// Installer hooks usually run as root without a session, so the fallback is
/// `$HOME/.cache` and finally the working directory.
fn installer_cache_dir() -> Option<PathBuf> {
    let cache_dir = std::env::var_os("XDG_CACHE_HOME").map_or_else(
        || {
            std::env::var_os("HOME")
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = cache_dir.join("player-app-installer");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for one lifecycle phase.
///
/// Each phase gets its own file, so a `post-install` run never clobbers the
/// `pre-install` log of the same transaction.
pub(super) fn log_file_path(phase: &str) -> Option<PathBuf> {
    Some(installer_cache_dir()?.join(format!("{phase}.log")))
}
