//! Ordered install-target plan.
//!
//! The plan is an append-only sequence: later entries (alias links) may
//! depend on earlier ones (the binaries they point at) so insertion order
//! is preserved exactly.
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::InstallerSettings;
use super::layout::Layout;

/// Boot floppies linked into the resources directory for easy install.
pub const FLOPPIES: [&str; 4] = [
    "vmscsi.flp",
    "pvscsi-Windows2003.flp",
    "pvscsi-Windows2008.flp",
    "pvscsi-WindowsXP.flp",
];

/// Program names that are aliases of the shared launcher.
pub const APP_LOADER_ALIASES: [&str; 8] = [
    "thnuclnt",
    "vmplayer",
    "vmware-enter-serial",
    "licenseTool",
    "vmware-unity-helper",
    "vmware-fuseUI",
    "vmware-app-control",
    "vmware-zenity",
];

/// Shared data subdirectories always installed.
const SHARED_DATA_DIRS: [&str; 3] = ["desktop-directories", "icons", "mime"];

/// Whether a declaration stages a file or creates a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    /// Copy files matching the source pattern.
    File,
    /// Create a symlink at the destination pointing at the source.
    Link,
}

/// One file or link for the packaging engine to stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDeclaration {
    /// File or link.
    pub kind: TargetKind,
    /// Payload-relative glob (files) or absolute link target (links).
    pub source: PathBuf,
    /// Installed path.
    pub destination: PathBuf,
}

/// Permission class applied to a staged path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Permission {
    /// Regular executable.
    Binary,
    /// Setuid-root executable.
    Setuid,
}

/// Permission assignment for a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDeclaration {
    /// Installed path or glob.
    pub path: PathBuf,
    /// Permission class.
    pub permission: Permission,
}

/// Ordered list of targets and permissions for one installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    targets: Vec<TargetDeclaration>,
    permissions: Vec<PermissionDeclaration>,
}

impl InstallPlan {
    /// Append a file declaration.
    pub fn file(&mut self, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) {
        self.targets.push(TargetDeclaration {
            kind: TargetKind::File,
            source: source.into(),
            destination: destination.into(),
        });
    }

    /// Append a link declaration; `destination` will point at `source`.
    pub fn link(&mut self, source: impl Into<PathBuf>, destination: impl Into<PathBuf>) {
        self.targets.push(TargetDeclaration {
            kind: TargetKind::Link,
            source: source.into(),
            destination: destination.into(),
        });
    }

    /// Append a permission assignment.
    pub fn permission(&mut self, path: impl Into<PathBuf>, permission: Permission) {
        self.permissions.push(PermissionDeclaration {
            path: path.into(),
            permission,
        });
    }

    /// Declarations in insertion order.
    #[must_use]
    pub fn targets(&self) -> &[TargetDeclaration] {
        &self.targets
    }

    /// Permission assignments in insertion order.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionDeclaration] {
        &self.permissions
    }

    /// Find the declaration installing `destination`.
    #[must_use]
    pub fn find(&self, destination: &Path) -> Option<&TargetDeclaration> {
        self.targets.iter().find(|t| t.destination == destination)
    }
}

/// Build the install plan for this component.
///
/// Desktop shortcuts and app metadata are only declared when the installer
/// is configured to install shortcuts. The hicolor theme index is only
/// shipped when the system does not already have one.
#[must_use]
pub fn initialize_install(layout: &Layout, installer: &InstallerSettings) -> InstallPlan {
    let mut plan = InstallPlan::default();
    let dest = &layout.dest;
    let shortcuts = installer.install_shortcuts;

    plan.file("bin/*", &layout.bindir);
    plan.file("sbin/*", &layout.sbindir);
    for dir in SHARED_DATA_DIRS {
        plan.file(format!("share/{dir}/*"), layout.datadir.join(dir));
    }
    if shortcuts {
        plan.file("share/applications/*", layout.datadir.join("applications"));
        plan.file("share/appdata/*", layout.datadir.join("appdata"));
    }
    plan.file("lib/*", dest);
    plan.file("doc/*", layout.docdir.join("vmware-player"));
    plan.file("etc/xdg/*", layout.sysconfdir.join("xdg"));
    plan.file("etc/cups/*", layout.sysconfdir.join("cups"));
    plan.file("etc/init.d/*", layout.sysconfdir.join("init.d"));
    plan.file("var/*", &layout.localstatedir);

    for floppy in FLOPPIES {
        plan.link(
            dest.join("floppies").join(floppy),
            dest.join("resources").join(floppy),
        );
    }

    let app_loader = layout.app_loader();
    for alias in APP_LOADER_ALIASES {
        plan.link(&app_loader, dest.join("bin").join(alias));
    }
    plan.permission(dest.join("bin/*"), Permission::Binary);

    // The print filter helper lives under /etc but must carry a library
    // file context, so it is a link to the launcher rather than a copy.
    plan.link(&app_loader, layout.sysconfdir.join("thnuclnt/.thnumod"));

    let cups_filter = layout.cups_filter();
    plan.file("extras/thnucups", &cups_filter);
    plan.permission(&cups_filter, Permission::Binary);

    if shortcuts {
        plan.link(
            layout.launcher(),
            layout
                .prefix
                .join("local/share/applications/vmware-player.desktop"),
        );
        plan.link(
            layout.datadir.join("appdata/vmware-player.appdata.xml"),
            layout
                .prefix
                .join("local/share/appdata/vmware-player.appdata.xml"),
        );
    }

    plan.permission(layout.mount_helper(), Permission::Setuid);

    let theme_index = layout.datadir.join("icons/hicolor/index.theme");
    if !theme_index.exists() {
        plan.file("files/index.theme", theme_index);
    }

    plan
}
