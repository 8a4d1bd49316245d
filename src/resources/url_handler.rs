//! `vm://` and `vms://` URL handlers registered in the GConf defaults.
use anyhow::Result;
use std::path::Path;

use super::{Applicable, ResourceChange};
use crate::exec::{CommandOpts, Executor, invoke, shell_escape};
use crate::logging::Log;

/// URL schemes used for VM streaming.
pub const SCHEMES: [&str; 2] = ["vm", "vms"];

/// System-wide GConf defaults source.
pub const GCONF_DEFAULTS: &str = "xml:readwrite:/etc/gconf/gconf.xml.defaults";

const GCONFTOOL: &str = "gconftool-2";

/// URL handler registration pointing both schemes at the product binary.
pub struct UrlHandlers<'a> {
    command: String,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl std::fmt::Debug for UrlHandlers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlHandlers")
            .field("command", &self.command)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<'a> UrlHandlers<'a> {
    /// Handlers that launch `binary` with the URL as its only argument.
    #[must_use]
    pub fn new(binary: &Path, executor: &'a dyn Executor, log: &'a dyn Log) -> Self {
        Self {
            command: format!("{} \"%s\"", shell_escape(&binary.display().to_string())),
            executor,
            log,
        }
    }

    /// Handler command line stored in GConf.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the GConf tool can be used on this system.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        invoke(
            self.executor,
            self.log,
            GCONFTOOL,
            &["--help"],
            CommandOpts::QUIET,
        )
        .is_some_and(|r| r.success)
    }

    fn gconf(&self, args: &[&str]) {
        let mut full = vec!["--direct", "--config-source", GCONF_DEFAULTS];
        full.extend_from_slice(args);
        invoke(
            self.executor,
            self.log,
            GCONFTOOL,
            &full,
            CommandOpts::LOGGED,
        );
    }

    /// Ask every running GConf daemon to reload.
    fn reload_daemons(&self) {
        invoke(
            self.executor,
            self.log,
            "killall",
            &["-HUP", "gconfd-2"],
            CommandOpts::TOLERANT,
        );
    }

    fn unusable() -> ResourceChange {
        ResourceChange::Skipped {
            reason: format!("{GCONFTOOL} is not usable"),
        }
    }
}

impl Applicable for UrlHandlers<'_> {
    fn description(&self) -> String {
        format!("vm:// and vms:// handlers -> {}", self.command)
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.is_usable() {
            return Ok(Self::unusable());
        }
        let settings = [
            ("string", "command", self.command.as_str()),
            ("bool", "enabled", "true"),
            ("bool", "needs_terminal", "false"),
        ];
        for scheme in SCHEMES {
            for (kind, name, value) in settings {
                let key = format!("/desktop/gnome/url-handlers/{scheme}/{name}");
                self.gconf(&["--type", kind, "--set", &key, value]);
            }
        }
        self.reload_daemons();
        Ok(ResourceChange::Applied)
    }

    fn remove(&self) -> Result<ResourceChange> {
        if !self.is_usable() {
            return Ok(Self::unusable());
        }
        for scheme in SCHEMES {
            let key = format!("/desktop/gnome/url-handlers/{scheme}");
            self.gconf(&["--recursive-unset", &key]);
        }
        self.reload_daemons();
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use crate::resources::test_helpers::RecordingExecutor;

    const SET_PREFIX: &str =
        "gconftool-2 --direct --config-source xml:readwrite:/etc/gconf/gconf.xml.defaults";

    #[test]
    fn command_is_shell_escaped() {
        let (log, _tmp, _guard) = isolated_logger();
        let executor = RecordingExecutor::new();
        let handlers = UrlHandlers::new(Path::new("/usr/bin/vmplayer"), &executor, &log);
        assert_eq!(handlers.command(), "'/usr/bin/vmplayer' \"%s\"");
    }

    #[test]
    fn apply_sets_three_keys_per_scheme_then_reloads() {
        let (log, _tmp, _guard) = isolated_logger();
        let executor = RecordingExecutor::new();
        let handlers = UrlHandlers::new(Path::new("/usr/bin/vmware"), &executor, &log);

        assert_eq!(handlers.apply().unwrap(), ResourceChange::Applied);

        let calls = executor.calls();
        assert_eq!(calls[0], "gconftool-2 --help");
        assert_eq!(executor.calls_starting_with(SET_PREFIX).len(), 6);
        assert_eq!(
            calls[1],
            format!(
                "{SET_PREFIX} --type string --set /desktop/gnome/url-handlers/vm/command \
                 '/usr/bin/vmware' \"%s\""
            )
        );
        assert_eq!(
            calls[6],
            format!("{SET_PREFIX} --type bool --set /desktop/gnome/url-handlers/vms/needs_terminal false")
        );
        assert_eq!(calls.last().unwrap(), "killall -HUP gconfd-2");
    }

    #[test]
    fn remove_unsets_each_scheme() {
        let (log, _tmp, _guard) = isolated_logger();
        let executor = RecordingExecutor::new();
        let handlers = UrlHandlers::new(Path::new("/usr/bin/vmplayer"), &executor, &log);

        assert_eq!(handlers.remove().unwrap(), ResourceChange::Applied);
        assert_eq!(
            executor.calls(),
            vec![
                "gconftool-2 --help".to_string(),
                format!("{SET_PREFIX} --recursive-unset /desktop/gnome/url-handlers/vm"),
                format!("{SET_PREFIX} --recursive-unset /desktop/gnome/url-handlers/vms"),
                "killall -HUP gconfd-2".to_string(),
            ]
        );
    }

    #[test]
    fn unusable_tool_skips_silently() {
        let (log, _tmp, _guard) = isolated_logger();
        let executor = RecordingExecutor::new().respond("gconftool-2 --help", 1, "");
        let handlers = UrlHandlers::new(Path::new("/usr/bin/vmplayer"), &executor, &log);
        assert!(matches!(handlers.apply().unwrap(), ResourceChange::Skipped { .. }));
        assert!(matches!(handlers.remove().unwrap(), ResourceChange::Skipped { .. }));
        assert_eq!(executor.calls().len(), 2);
    }

    #[test]
    fn missing_tool_skips_silently() {
        let (log, _tmp, _guard) = isolated_logger();
        let executor = RecordingExecutor::new().unspawnable("gconftool-2");
        let handlers = UrlHandlers::new(Path::new("/usr/bin/vmplayer"), &executor, &log);
        assert!(!handlers.is_usable());
    }
}
