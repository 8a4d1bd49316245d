//! Adding and removing uninstall links.
use anyhow::Result;

use super::helpers::{Direction, process_resource};
use super::{Context, Task, TaskResult};
use crate::resources::uninstall_links::UninstallLinks;

fn links(ctx: &Context) -> UninstallLinks {
    UninstallLinks::new(&ctx.layout, &ctx.config.installer.version)
}

/// Point the legacy uninstaller entry points at the downgrade uninstaller.
#[derive(Debug)]
pub struct AddUninstallLinks;

impl Task for AddUninstallLinks {
    fn name(&self) -> &'static str {
        "Add uninstaller links"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &links(ctx), Direction::Apply)
    }
}

/// Remove the legacy uninstaller entry points.
#[derive(Debug)]
pub struct RemoveUninstallLinks;

impl Task for RemoveUninstallLinks {
    fn name(&self) -> &'static str {
        "Remove uninstaller links"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &links(ctx), Direction::Remove)
    }
}
