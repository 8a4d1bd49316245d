//! Help text shown next to the install questions.
use anyhow::Result;
use std::path::Path;

use super::{Context, Task, TaskResult};
use crate::logging::Log;

/// Read the "Learn More" text from `path`.
///
/// A missing or unreadable file yields an empty text; the questions are
/// still asked without it.
#[must_use]
pub fn load_help_text(path: &Path, log: &dyn Log) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log.warn(&format!("cannot read help text {}: {e}", path.display()));
            String::new()
        }
    }
}

/// Check that the help text for the questions is in the payload.
///
/// Only the file's presence and size are checked; the text itself is read
/// by `initialize-questions` when the questions are printed.
#[derive(Debug)]
pub struct CheckHelpText;

impl Task for CheckHelpText {
    fn name(&self) -> &'static str {
        "Check help text"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = ctx.layout.learn_more();
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {
                ctx.log
                    .debug(&format!("{} holds {} bytes", path.display(), meta.len()));
                Ok(TaskResult::Ok)
            }
            Ok(_) => Ok(TaskResult::Skipped(format!("{} is empty", path.display()))),
            Err(e) => Ok(TaskResult::Skipped(format!("{}: {e}", path.display()))),
        }
    }
}
