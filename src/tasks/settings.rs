//! Product settings in the external configuration store.
use anyhow::{Result, bail};

use super::{Context, Task, TaskResult};
use crate::resources::config_store::{
    ConfigStore, build_settings, random_epoch, remove_base_settings, write_settings,
};

fn store(ctx: &Context) -> ConfigStore<'_> {
    ConfigStore::new(ctx.layout.config_tool(), &*ctx.executor, &*ctx.log)
}

/// Compute the settings for the installed version and write what changed.
#[derive(Debug)]
pub struct WriteSettings;

impl Task for WriteSettings {
    fn name(&self) -> &'static str {
        "Write settings"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let store = store(ctx);
        let config = &ctx.config;
        let mut epoch = random_epoch;
        let map = build_settings(
            &config.answers,
            &config.manifest,
            ctx.transaction.new.as_deref(),
            &store,
            &mut epoch,
        );
        ctx.log.debug(&format!("{} settings computed", map.len()));

        let stats = write_settings(&map, &store, &*ctx.log);
        ctx.log.info(&format!("settings: {}", stats.summary()));
        if stats.failed > 0 {
            bail!("{} settings could not be written", stats.failed);
        }
        Ok(TaskResult::Ok)
    }
}

/// Remove the keys that identify the installed product.
#[derive(Debug)]
pub struct RemoveSettings;

impl Task for RemoveSettings {
    fn name(&self) -> &'static str {
        "Remove settings"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let failed = remove_base_settings(&store(ctx), &*ctx.log);
        if failed > 0 {
            bail!("{failed} settings could not be removed");
        }
        Ok(TaskResult::Ok)
    }
}
