//! Desktop environment integration: launcher, URL handlers, prelink, caches.
use anyhow::Result;

use super::helpers::{Direction, process_resource};
use super::{Context, Task, TaskResult};
use crate::resources::desktop_cache;
use crate::resources::launcher::LauncherBinding;
use crate::resources::prelink::PrelinkExclusion;
use crate::resources::url_handler::UrlHandlers;

fn url_handlers(ctx: &Context) -> UrlHandlers<'_> {
    let binary = ctx
        .layout
        .url_handler_binary(ctx.config.product.kind);
    UrlHandlers::new(&binary, &*ctx.executor, &*ctx.log)
}

fn prelink(ctx: &Context) -> PrelinkExclusion<'_> {
    PrelinkExclusion::new(
        ctx.layout.prelink_conf(),
        &ctx.layout.app_loader(),
        &*ctx.log,
    )
}

/// Point the desktop launcher at the installed player binary.
#[derive(Debug)]
pub struct BindLauncher;

impl Task for BindLauncher {
    fn name(&self) -> &'static str {
        "Bind desktop launcher"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let binding = LauncherBinding::new(
            ctx.layout.launcher(),
            &ctx.layout.bindir.join("vmplayer"),
        );
        process_resource(ctx, &binding, Direction::Apply)
    }
}

/// Register the `vm://` and `vms://` URL handlers.
#[derive(Debug)]
pub struct ConfigureUrlHandlers;

impl Task for ConfigureUrlHandlers {
    fn name(&self) -> &'static str {
        "Configure URL handlers"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &url_handlers(ctx), Direction::Apply)
    }
}

/// Unregister the `vm://` and `vms://` URL handlers.
#[derive(Debug)]
pub struct DeconfigureUrlHandlers;

impl Task for DeconfigureUrlHandlers {
    fn name(&self) -> &'static str {
        "Deconfigure URL handlers"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &url_handlers(ctx), Direction::Remove)
    }
}

/// Exclude the launcher binary from prelinking.
#[derive(Debug)]
pub struct ConfigurePrelink;

impl Task for ConfigurePrelink {
    fn name(&self) -> &'static str {
        "Configure prelink"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &prelink(ctx), Direction::Apply)
    }
}

/// Drop the launcher exclusion from the prelink configuration.
#[derive(Debug)]
pub struct DeconfigurePrelink;

impl Task for DeconfigurePrelink {
    fn name(&self) -> &'static str {
        "Deconfigure prelink"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resource(ctx, &prelink(ctx), Direction::Remove)
    }
}

/// Refresh icon, desktop entry and MIME caches.
#[derive(Debug)]
pub struct RefreshDesktopCaches;

impl Task for RefreshDesktopCaches {
    fn name(&self) -> &'static str {
        "Refresh desktop caches"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let ran = desktop_cache::refresh(&ctx.layout.datadir, &*ctx.executor, &*ctx.log);
        if ran == 0 {
            return Ok(TaskResult::Skipped("no cache tools installed".to_string()));
        }
        Ok(TaskResult::Ok)
    }
}
