#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the install side of the lifecycle.
//!
//! These tests run whole phases against a temporary install root with a
//! recording executor, and pin the ordered step lists with snapshots.

mod common;

use player_app_installer::commands::CommandSetup;
use player_app_installer::commands::plan;
use player_app_installer::config::targets::{TargetKind, initialize_install};
use player_app_installer::logging::TaskStatus;
use player_app_installer::tasks::{self, Phase, Transaction};

use common::{Fixture, RecordingExecutor};

fn install(version: &str) -> Transaction {
    Transaction {
        new: Some(version.to_string()),
        ..Transaction::default()
    }
}

fn step_names(phase: Phase) -> String {
    phase
        .tasks()
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Snapshots: ordered step lists
// ---------------------------------------------------------------------------

#[test]
fn pre_install_steps() {
    insta::assert_snapshot!("pre_install_steps", step_names(Phase::PreInstall));
}

#[test]
fn post_install_steps() {
    insta::assert_snapshot!("post_install_steps", step_names(Phase::PostInstall));
}

/// Snapshot of the full install plan for a prefix that does not exist, so
/// the hicolor theme index is declared and CUPS falls back to `lib/cups`.
#[test]
fn install_plan() {
    let mut fixture = Fixture::new();
    fixture.config.paths.prefix = "/opt/player-test/usr".into();
    fixture.config.paths.sysconfdir = "/opt/player-test/etc".into();
    fixture.config.paths.localstatedir = "/opt/player-test/var".into();
    let plan = initialize_install(&fixture.layout(), &fixture.config.installer);

    let mut lines: Vec<String> = plan
        .targets()
        .iter()
        .map(|t| {
            format!(
                "{:?} {} -> {}",
                t.kind,
                t.source.display(),
                t.destination.display()
            )
        })
        .collect();
    lines.push(String::new());
    lines.extend(
        plan.permissions()
            .iter()
            .map(|p| format!("{:?} {}", p.permission, p.path.display())),
    );
    insta::assert_snapshot!("install_plan", lines.join("\n"));
}

// ---------------------------------------------------------------------------
// Declarative phases
// ---------------------------------------------------------------------------

/// Every link in the plan points at an absolute path inside the prefix.
#[test]
fn install_plan_links_stay_inside_prefix() {
    let mut fixture = Fixture::new();
    fixture.config.paths.prefix = "/opt/player-test/usr".into();
    let plan = initialize_install(&fixture.layout(), &fixture.config.installer);

    let links: Vec<_> = plan
        .targets()
        .iter()
        .filter(|t| t.kind == TargetKind::Link)
        .collect();
    assert!(!links.is_empty());
    for link in links {
        assert!(
            link.source.starts_with("/opt/player-test/usr"),
            "link source outside prefix: {}",
            link.source.display()
        );
    }
}

#[test]
fn install_plan_without_shortcuts_omits_desktop_entries() {
    let mut fixture = Fixture::new();
    fixture.config.installer.install_shortcuts = false;
    let layout = fixture.layout();
    let plan = initialize_install(&layout, &fixture.config.installer);

    assert!(
        plan.find(&layout.datadir.join("applications")).is_none(),
        "applications directory must not be declared"
    );
    assert!(plan.find(&layout.bindir).is_some());
}

#[test]
fn questions_use_help_text_from_payload() {
    let fixture = Fixture::new();
    fixture.write("component/doc/LearnMore.txt", "Sends anonymous data.\n");
    let log = player_app_installer::logging::Logger::new("integration");
    let setup = CommandSetup {
        config: fixture.config.clone(),
        layout: fixture.layout(),
    };

    let json: serde_json::Value =
        serde_json::from_str(&plan::questions_json(&setup, &log).unwrap()).unwrap();
    let questions = json.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    for question in questions {
        assert_eq!(question["html"][0], "Learn More");
        assert_eq!(question["html"][1], "Sends anonymous data.\n");
        assert_eq!(question["default"], "yes");
    }
}

// ---------------------------------------------------------------------------
// Side-effecting phases
// ---------------------------------------------------------------------------

#[test]
fn pre_install_kills_product_processes_once() {
    let fixture = Fixture::new();
    let (ctx, exec, _log) = fixture.context(install("16.2.0"), RecordingExecutor::new());

    tasks::run_phase(Phase::PreInstall, &ctx).unwrap();
    let kills = exec.calls_starting_with("killall");
    assert_eq!(kills.len(), 1);
    assert!(kills[0].contains("vmplayer"));
}

#[test]
fn post_install_configures_fresh_root() {
    let fixture = Fixture::new();
    fixture
        .write(
            "usr/share/applications/vmware-player.desktop",
            "[Desktop Entry]\nExec=@@BINARY@@ %U\n",
        )
        .write("etc/prelink.conf", "-l /usr/lib\n");
    let (ctx, exec, log) = fixture.context(install("16.2.0"), RecordingExecutor::new());

    tasks::run_phase(Phase::PostInstall, &ctx).unwrap();
    assert_eq!(log.failure_count(), 0);

    let binary = fixture.path("usr/bin/vmplayer");
    assert_eq!(
        fixture.read("usr/share/applications/vmware-player.desktop"),
        format!("[Desktop Entry]\nExec={} %U\n", binary.display())
    );

    let prelink = fixture.read("etc/prelink.conf");
    assert!(prelink.starts_with("-l /usr/lib\n"));
    assert!(prelink.contains(&format!(
        "-b {}",
        fixture.path("usr/lib/vmware/bin/appLoader").display()
    )));

    let tool = fixture.path("usr/lib/vmware/setup/vmware-config");
    assert!(
        exec.calls()
            .contains(&format!("{} -s player.product.version 16.2.0", tool.display()))
    );

    assert!(fixture.exists("usr/bin/vmware-uninstall"));
    assert!(fixture.exists("etc/vmware/locations"));
}

#[test]
fn post_install_twice_is_idempotent() {
    let fixture = Fixture::new();
    fixture.write("etc/prelink.conf", "");
    let (ctx, _exec, _log) = fixture.context(install("16.2.0"), RecordingExecutor::new());

    tasks::run_phase(Phase::PostInstall, &ctx).unwrap();
    let first = fixture.read("etc/prelink.conf");
    tasks::run_phase(Phase::PostInstall, &ctx).unwrap();
    assert_eq!(fixture.read("etc/prelink.conf"), first);
}

#[test]
fn post_install_settings_failure_is_not_fatal() {
    let fixture = Fixture::new();
    let tool = fixture.path("usr/lib/vmware/setup/vmware-config");
    let exec = RecordingExecutor::new().exit_code(
        &format!("{} -s player.product.version 16.2.0", tool.display()),
        1,
    );
    let (ctx, _exec, log) = fixture.context(install("16.2.0"), exec);

    tasks::run_phase(Phase::PostInstall, &ctx).unwrap();
    let entries = log.task_entries();
    let settings = entries
        .iter()
        .find(|e| e.name == "Write settings")
        .unwrap();
    assert_eq!(settings.status, TaskStatus::Failed);
    assert!(
        entries.iter().any(|e| e.name == "Add uninstaller links"),
        "later steps must still run"
    );
}
