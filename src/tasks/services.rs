//! Print filter relabelling and init script restarts.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::init_script::InitScript;
use crate::resources::selinux;

/// Init script of the print spooler.
const PRINT_SERVICE: &str = "cups";

/// Init scripts of this product, restarted after install.
const PRODUCT_SERVICES: [&str; 1] = ["vmware"];

fn installed_script(ctx: &Context, name: &str) -> Option<InitScript> {
    ctx.layout
        .init_script(name)
        .map(|path| InitScript::new(&path))
        .filter(InitScript::exists)
}

/// Give the print filter the security context the spooler expects.
#[derive(Debug)]
pub struct RelabelPrintFilter;

impl Task for RelabelPrintFilter {
    fn name(&self) -> &'static str {
        "Relabel print filter"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if selinux::relabel(&ctx.layout.cups_filter(), &*ctx.executor, &*ctx.log) {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Skipped("restorecon not installed".to_string()))
        }
    }
}

/// Restart the print spooler so it picks up the new filter.
#[derive(Debug)]
pub struct RestartPrintService;

impl Task for RestartPrintService {
    fn name(&self) -> &'static str {
        "Restart print service"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        installed_script(ctx, PRINT_SERVICE).is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Some(script) = installed_script(ctx, PRINT_SERVICE) {
            script.restart(&*ctx.executor, &*ctx.log);
        }
        Ok(TaskResult::Ok)
    }
}

/// Restart the product services stopped before install.
#[derive(Debug)]
pub struct RestartProductService;

impl Task for RestartProductService {
    fn name(&self) -> &'static str {
        "Restart product service"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        PRODUCT_SERVICES
            .iter()
            .any(|name| installed_script(ctx, name).is_some())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for name in PRODUCT_SERVICES {
            if let Some(script) = installed_script(ctx, name) {
                script.stop_start(&*ctx.executor, &*ctx.log);
            }
        }
        Ok(TaskResult::Ok)
    }
}
