//! Helper utilities for common task patterns.

use super::{Context, TaskResult};
use crate::resources::{Applicable, ResourceChange};

/// Direction of a resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the resource.
    Apply,
    /// Remove the resource.
    Remove,
}

/// Apply or remove `resource`, logging and mapping the outcome.
///
/// # Errors
///
/// Propagates the error from the resource.
pub fn process_resource(
    ctx: &Context,
    resource: &dyn Applicable,
    direction: Direction,
) -> anyhow::Result<TaskResult> {
    let change = match direction {
        Direction::Apply => resource.apply()?,
        Direction::Remove => resource.remove()?,
    };
    Ok(to_task_result(ctx, &resource.description(), change))
}

/// Map a [`ResourceChange`] to a [`TaskResult`], logging the change.
#[must_use]
pub fn to_task_result(ctx: &Context, item: &str, change: ResourceChange) -> TaskResult {
    match change {
        ResourceChange::Applied => {
            ctx.log.debug(&format!("changed: {item}"));
            TaskResult::Ok
        }
        ResourceChange::AlreadyCorrect => {
            ctx.log
                .debug(&format!("ok: {item} (already in desired state)"));
            TaskResult::Ok
        }
        ResourceChange::Skipped { reason } => TaskResult::Skipped(reason),
    }
}
