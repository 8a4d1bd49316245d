// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed install root and a recording command
// executor so each integration test can drive whole lifecycle phases without
// touching the host system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use player_app_installer::config::layout::Layout;
use player_app_installer::config::{InstallerConfig, Paths};
use player_app_installer::exec::{ExecResult, Executor};
use player_app_installer::logging::{Log, Logger};
use player_app_installer::tasks::{Context, Transaction};

/// Executor that records every command line and never spawns anything.
///
/// Command lines are the program and its arguments joined with spaces.
/// Unscripted commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    responses: HashMap<String, i32>,
}

impl RecordingExecutor {
    /// Create an executor with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the exact command line `line` exit with `code`.
    pub fn exit_code(mut self, line: &str, code: i32) -> Self {
        self.responses.insert(line.to_string(), code);
        self
    }

    /// Command lines issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Command lines issued so far that start with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            anyhow::bail!("{program} failed (exit {})", result.exit_code());
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line.clone());
        let code = self.responses.get(&line).copied().unwrap_or(0);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: code == 0,
            code: Some(code),
        })
    }

    fn which(&self, _program: &str) -> bool {
        false
    }
}

/// An isolated install root backed by a [`tempfile::TempDir`].
///
/// Prefix, sysconfdir and localstatedir all live under the root, so phases
/// run against it see only what the test created.
pub struct Fixture {
    /// Temporary directory acting as `/`.
    pub root: tempfile::TempDir,
    /// Configuration rooted at [`Self::root`].
    pub config: InstallerConfig,
}

impl Fixture {
    /// Create an empty install root.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let config = InstallerConfig {
            paths: Paths {
                prefix: root.path().join("usr"),
                sysconfdir: root.path().join("etc"),
                localstatedir: root.path().join("var"),
                initscriptdir: None,
                component_dir: root.path().join("component"),
            },
            ..InstallerConfig::default()
        };
        Self { root, config }
    }

    /// Absolute path of `rel` inside the root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write fixture file");
        self
    }

    /// Read `rel` as a string.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read fixture file")
    }

    /// Whether `rel` exists (without following a final symlink).
    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).symlink_metadata().is_ok()
    }

    /// The resolved layout for this root.
    pub fn layout(&self) -> Layout {
        Layout::resolve(&self.config.paths)
    }

    /// Build a phase context around `executor`.
    pub fn context(
        &self,
        transaction: Transaction,
        executor: RecordingExecutor,
    ) -> (Context, Arc<RecordingExecutor>, Arc<Logger>) {
        let executor = Arc::new(executor);
        let log = Arc::new(Logger::new("integration"));
        let ctx = Context::new(
            Arc::new(self.config.clone()),
            Arc::new(self.layout()),
            Arc::clone(&log) as Arc<dyn Log>,
            Arc::clone(&executor) as Arc<dyn Executor>,
            transaction,
        );
        (ctx, executor, log)
    }
}

