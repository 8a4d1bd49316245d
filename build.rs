//! Build script that stamps the installer version into the binary.

use std::process::Command;

fn main() {
    // Release pipelines stamp the build number; local builds fall back to git.
    if let Ok(version) = std::env::var("PLAYER_INSTALLER_VERSION") {
        println!("cargo:rustc-env=PLAYER_INSTALLER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=PLAYER_INSTALLER_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=PLAYER_INSTALLER_VERSION");
}
