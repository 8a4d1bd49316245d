//! Command: edit a managed block in a text file.
use anyhow::Result;

use crate::cli::SentinelAction;
use crate::logging::Log;
use crate::resources::sentinel::{self, Placement};

/// Perform one sentinel edit.
///
/// A missing file is reported but not treated as a failure. Returns whether
/// the file existed.
///
/// # Errors
///
/// Returns an error if the file holds conflicting managed blocks or cannot
/// be rewritten.
pub fn run(action: &SentinelAction, log: &dyn Log) -> Result<bool> {
    match action {
        SentinelAction::Insert {
            file,
            text,
            prepend,
        } => {
            let placement = if *prepend {
                Placement::Prepend
            } else {
                Placement::Append
            };
            let replacing = sentinel::has_block(file)?;
            let done = sentinel::insert(file, text, placement, log)?;
            if done {
                let verb = if replacing { "replaced in" } else { "written to" };
                log.info(&format!("managed block {verb} {}", file.display()));
            }
            Ok(done)
        }
        SentinelAction::Remove { file } => {
            let present = sentinel::has_block(file)?;
            let done = sentinel::remove(file, log)?;
            if done {
                if present {
                    log.info(&format!("managed block cleared from {}", file.display()));
                } else {
                    log.info(&format!("no managed block in {}", file.display()));
                }
            }
            Ok(done)
        }
    }
}
