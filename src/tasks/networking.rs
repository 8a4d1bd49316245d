//! Cleanup of virtual network state after uninstall.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::networking::NetworkingState;

fn state(ctx: &Context) -> NetworkingState<'_> {
    NetworkingState::new(&ctx.layout.etcdir, &*ctx.log)
}

/// Remove the network configuration unless it must be kept.
#[derive(Debug)]
pub struct RemoveNetworkConfig;

impl Task for RemoveNetworkConfig {
    fn name(&self) -> &'static str {
        "Remove network configuration"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.keeps_config()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if state(ctx).remove_config()? {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Skipped("no network configuration".to_string()))
        }
    }
}

/// Remove backups of the network configuration.
#[derive(Debug)]
pub struct RemoveNetworkBackups;

impl Task for RemoveNetworkBackups {
    fn name(&self) -> &'static str {
        "Remove network configuration backups"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let removed = state(ctx).remove_backups()?;
        ctx.log.debug(&format!("{removed} backups removed"));
        Ok(TaskResult::Ok)
    }
}

/// Remove per-adapter virtual network state.
#[derive(Debug)]
pub struct RemoveVmnetState;

impl Task for RemoveVmnetState {
    fn name(&self) -> &'static str {
        "Remove virtual network state"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let removed = state(ctx).remove_vmnet_dirs();
        ctx.log.debug(&format!("{removed} vmnet directories removed"));
        Ok(TaskResult::Ok)
    }
}
