//! Idempotent system integration primitives (check + apply pattern).
pub mod config_store;
pub mod desktop_cache;
pub mod error;
pub mod helpers;
pub mod init_script;
pub mod launcher;
pub mod mount;
pub mod networking;
pub mod prelink;
pub mod processes;
pub mod selinux;
pub mod sentinel;
pub mod uninstall_links;
pub mod url_handler;

use anyhow::Result;

/// Minimal interface for resources that can be described, applied, and removed.
///
/// Resources whose state cannot be queried cheaply (e.g. URL handlers kept
/// in an external settings daemon) implement only this trait. Resources that
/// can determine their own state implement the richer [`Resource`]
/// super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, invalid paths, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;

    /// Remove the resource, undoing a previous `apply()`.
    ///
    /// Default implementation returns an error; override in resources
    /// that support removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be removed, or if removal is not supported
    /// for this resource type.
    fn remove(&self) -> Result<ResourceChange> {
        anyhow::bail!(
            "operation 'remove' is not supported for resource '{}'",
            self.description()
        )
    }
}

/// State of a resource (file contents, links, etc.).
///
/// # Examples
///
/// ```
/// use player_app_installer::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "points to /opt/old".into() };
/// let skip = ResourceState::Invalid { reason: "file does not exist".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., the file it edits is absent).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying or removing a resource.
///
/// # Examples
///
/// ```
/// use player_app_installer::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "prelink not present".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, updated or removed.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g., the file it edits or the tool it needs is missing).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
///
/// Extends [`Applicable`] with state-checking methods for resources that can
/// independently determine their own state.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O failures,
    /// permission issues, or other system errors.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the current state cannot be determined (propagates errors from
    /// `current_state()`).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

/// Shared test helpers for resource and task unit tests.
#[cfg(test)]
pub mod test_helpers {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use crate::exec::{ExecResult, Executor};

    /// An executor that records every command line instead of running it.
    ///
    /// Unscripted commands succeed with empty output. Use
    /// [`respond`](Self::respond) to script the exit code and stdout of an
    /// exact command line, [`with_program`](Self::with_program) to make
    /// [`Executor::which`] find a program, and
    /// [`unspawnable`](Self::unspawnable) to simulate a program that cannot
    /// be started at all.
    #[derive(Debug, Default)]
    pub struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
        responses: HashMap<String, (i32, String)>,
        on_path: HashSet<String>,
        unspawnable: HashSet<String>,
    }

    impl RecordingExecutor {
        /// Create an executor with no scripted responses.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the outcome of the exact command line `line`.
        #[must_use]
        pub fn respond(mut self, line: &str, code: i32, stdout: &str) -> Self {
            self.responses
                .insert(line.to_string(), (code, stdout.to_string()));
            self
        }

        /// Report `program` as available on `PATH`.
        #[must_use]
        pub fn with_program(mut self, program: &str) -> Self {
            self.on_path.insert(program.to_string());
            self
        }

        /// Make every invocation of `program` fail to spawn.
        #[must_use]
        pub fn unspawnable(mut self, program: &str) -> Self {
            self.unspawnable.insert(program.to_string());
            self
        }

        /// Command lines issued so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map_or_else(|_| vec![], |g| g.clone())
        }

        /// Command lines issued so far that start with `prefix`.
        #[must_use]
        pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with(prefix))
                .collect()
        }
    }

    impl Executor for RecordingExecutor {
        fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            let result = self.run_unchecked(program, args)?;
            if !result.success {
                anyhow::bail!("{program} failed (exit {})", result.exit_code());
            }
            Ok(result)
        }

        fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            let line = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            if let Ok(mut guard) = self.calls.lock() {
                guard.push(line.clone());
            }
            if self.unspawnable.contains(program) {
                anyhow::bail!("failed to execute: {program}");
            }
            let (code, stdout) = self
                .responses
                .get(&line)
                .cloned()
                .unwrap_or_else(|| (0, String::new()));
            Ok(ExecResult {
                stdout,
                stderr: String::new(),
                success: code == 0,
                code: Some(code),
            })
        }

        fn which(&self, program: &str) -> bool {
            self.on_path.contains(program)
        }
    }
}
