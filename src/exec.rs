//! External command execution.
//!
//! Every side effect outside the filesystem goes through the [`Executor`]
//! trait so lifecycle steps can be exercised against a recording fake.
use anyhow::{Context as _, Result, bail};
use std::process::{Command, Output};

use crate::logging::Log;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Exit code, or `-1` when the process did not exit normally.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns the result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the command cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.exit_code(),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Logging and failure policy for one command invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOpts {
    /// Do not log the command line or its outcome.
    pub quiet: bool,
    /// A non-zero exit is expected and only logged at debug level.
    pub ignore_errors: bool,
}

impl CommandOpts {
    /// Log the invocation and warn on failure.
    pub const LOGGED: Self = Self {
        quiet: false,
        ignore_errors: false,
    };
    /// Log the invocation; failures are expected.
    pub const TOLERANT: Self = Self {
        quiet: false,
        ignore_errors: true,
    };
    /// Probe-style call: no logging at all.
    pub const QUIET: Self = Self {
        quiet: true,
        ignore_errors: true,
    };
}

/// Run a command under the lifecycle failure policy.
///
/// A non-zero exit never aborts the caller: the result is returned for
/// inspection and the failure is logged according to `opts`. Returns `None`
/// when the process could not be spawned at all.
#[allow(clippy::must_use_candidate)]
pub fn invoke(
    executor: &dyn Executor,
    log: &dyn Log,
    program: &str,
    args: &[&str],
    opts: CommandOpts,
) -> Option<ExecResult> {
    let line = if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    };
    if !opts.quiet {
        log.debug(&format!("running: {line}"));
    }

    match executor.run_unchecked(program, args) {
        Ok(result) => {
            if !result.success && !opts.quiet {
                let msg = format!(
                    "{line} exited with {}: {}",
                    result.exit_code(),
                    result.stderr.trim()
                );
                if opts.ignore_errors {
                    log.debug(&msg);
                } else {
                    log.warn(&msg);
                }
            }
            Some(result)
        }
        Err(e) => {
            if !opts.quiet {
                if opts.ignore_errors {
                    log.debug(&format!("{e:#}"));
                } else {
                    log.warn(&format!("{e:#}"));
                }
            }
            None
        }
    }
}

/// Quote a string for use as a single shell word.
#[must_use]
pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    #[test]
    fn run_echo() {
        let result = SystemExecutor.run("echo", &["hello"]).unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_failure() {
        let result = SystemExecutor.run("false", &[]);
        assert!(result.is_err(), "non-zero exit should produce an error");
    }

    #[test]
    fn run_unchecked_failure() {
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn which_missing_program() {
        assert!(!SystemExecutor.which("this-program-does-not-exist-12345"));
    }

    #[test]
    fn invoke_returns_result_on_failure() {
        let (log, _tmp, _guard) = isolated_logger();
        let result = invoke(&SystemExecutor, &log, "false", &[], CommandOpts::LOGGED)
            .expect("false can be spawned");
        assert!(!result.success);
    }

    #[test]
    fn invoke_returns_none_when_spawn_fails() {
        let (log, _tmp, _guard) = isolated_logger();
        let result = invoke(
            &SystemExecutor,
            &log,
            "this-program-does-not-exist-12345",
            &[],
            CommandOpts::QUIET,
        );
        assert!(result.is_none());
    }

    #[test]
    fn shell_escape_wraps_in_single_quotes() {
        assert_eq!(shell_escape("/usr/bin/vmplayer"), "'/usr/bin/vmplayer'");
    }

    #[test]
    fn shell_escape_handles_embedded_quote() {
        assert_eq!(shell_escape("it's"), "'it'\"'\"'s'");
    }
}
