//! Stopping running product processes.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::processes::kill_product_processes;

/// Terminate running product processes before files change underneath them.
#[derive(Debug)]
pub struct StopProductProcesses;

impl Task for StopProductProcesses {
    fn name(&self) -> &'static str {
        "Stop product processes"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        kill_product_processes(&*ctx.executor, &*ctx.log, ctx.upgrading());
        Ok(TaskResult::Ok)
    }
}
