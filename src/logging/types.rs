//! Core logging types: step entries, status, and the [`Log`] trait.

/// Lifecycle step result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable step name.
    pub name: String,
    /// Final status of the step.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Step completed successfully.
    Ok,
    /// Step does not apply to this system or this transaction.
    NotApplicable,
    /// Step ran but decided there was nothing to do (e.g., tool missing).
    Skipped,
    /// Step encountered an error.
    Failed,
}

impl TaskStatus {
    /// Short label used in summary lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Abstraction over logging backends.
///
/// Lifecycle steps log through this trait so tests can swap in a logger
/// without a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log a warning followed by `text` exactly as it was read, line by line.
    fn warn_text(&self, msg: &str, text: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a step result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
