//! Phase logger: forwards to [`tracing`] and keeps the per-step summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::paths::log_file_path;
use super::types::{Log, TaskEntry, TaskStatus};
use super::{STAGE_TARGET, SUMMARY_TARGET};

/// Logger for one lifecycle phase.
///
/// Console and file output both go through [`tracing`]; the file copy lives
/// at `$XDG_CACHE_HOME/player-app-installer/<phase>.log` and always includes
/// debug lines, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    phase: String,
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create the logger for `phase`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(phase: &str) -> Self {
        Self {
            phase: phase.to_string(),
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(phase),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded step entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed steps.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Log one line per recorded step, then the totals and the log file.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage(&format!("{} summary", self.phase));

        let mut counts = [0usize; 4];
        for task in &tasks {
            let slot = match task.status {
                TaskStatus::Ok => 0,
                TaskStatus::NotApplicable => 1,
                TaskStatus::Skipped => 2,
                TaskStatus::Failed => 3,
            };
            if let Some(n) = counts.get_mut(slot) {
                *n += 1;
            }
            let detail = task
                .message
                .as_deref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            tracing::info!(
                target: SUMMARY_TARGET,
                status = task.status.label(),
                "{}{detail}",
                task.name
            );
        }

        let [ok, not_applicable, skipped, failed] = counts;
        self.info(&format!(
            "{} steps: {ok} ok, {not_applicable} n/a, {skipped} skipped, {failed} failed",
            tasks.len()
        ));
        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn warn_text(&self, msg: &str, text: &str) {
        tracing::warn!(text, "{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
