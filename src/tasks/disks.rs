//! Unmounting virtual disks before uninstall.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::mount::MountHelper;

/// Unmount every virtual disk before the helper that mounted them goes away.
///
/// The only required step: a disk that stays mounted aborts the uninstall.
#[derive(Debug)]
pub struct UnmountVirtualDisks;

impl Task for UnmountVirtualDisks {
    fn name(&self) -> &'static str {
        "Unmount virtual disks"
    }

    fn required(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let helper = MountHelper::new(&ctx.layout.mount_helper(), &*ctx.executor, &*ctx.log);
        if !helper.is_runnable() {
            ctx.log
                .info("vmware-mount did not exist or was unable to be run");
            return Ok(TaskResult::Skipped("mount helper not runnable".to_string()));
        }
        helper.unmount_all()?;
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LifecycleError;
    use crate::tasks::Transaction;
    use crate::tasks::test_helpers::{
        RecordingExecutor, make_context, make_context_with, rooted_config, test_config,
    };

    #[test]
    fn missing_helper_is_skipped() {
        let (ctx, exec) = make_context(test_config(), Transaction::default());
        assert!(matches!(
            UnmountVirtualDisks.run(&ctx).unwrap(),
            TaskResult::Skipped(_)
        ));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn unmount_failure_carries_lifecycle_error() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("usr/bin");
        std::fs::create_dir_all(&bin).unwrap();
        let helper = bin.join("vmware-mount");
        std::fs::write(&helper, "").unwrap();
        let exec = RecordingExecutor::new().respond(&format!("{} -X", helper.display()), 1, "");
        let (ctx, _exec) = make_context_with(rooted_config(dir.path()), Transaction::default(), exec);

        let err = UnmountVirtualDisks.run(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LifecycleError>(),
            Some(LifecycleError::DisksStillMounted { .. })
        ));
    }
}
