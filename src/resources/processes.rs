//! Termination of running product processes.
use crate::exec::{CommandOpts, Executor, invoke};
use crate::logging::Log;

/// Processes that must not survive an install or uninstall.
pub const PRODUCT_PROCESSES: [&str; 10] = [
    "vmplayer",
    "vmware",
    "vmware-tray",
    "vmware-unity-helper",
    "vmware-enter-serial",
    "vmnet-natd",
    "vmnet-dhcpd",
    "vmware-netcfg",
    "vmnet-netifup",
    "vmnet-bridge",
];

/// Disk-mount UI helper. Kept alive during an upgrade so mounted virtual
/// disks stay mounted across it.
pub const FUSE_UI: &str = "vmware-fuseUI";

/// Names of the processes to terminate for this transaction.
#[must_use]
pub fn kill_list(upgrade: bool) -> Vec<&'static str> {
    let mut names = PRODUCT_PROCESSES.to_vec();
    if !upgrade {
        names.push(FUSE_UI);
    }
    names
}

/// Terminate every product process by name.
///
/// Absent processes are expected, so the outcome is neither checked nor
/// logged.
pub fn kill_product_processes(executor: &dyn Executor, log: &dyn Log, upgrade: bool) {
    let names = kill_list(upgrade);
    log.debug(&format!("terminating: {}", names.join(" ")));
    invoke(executor, log, "killall", &names, CommandOpts::QUIET);
}
