//! Resolved filesystem layout for one lifecycle phase.
use std::path::PathBuf;

use super::Paths;

/// Every directory and well-known file the hooks touch, derived once from
/// [`Paths`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Installation prefix (`/usr`).
    pub prefix: PathBuf,
    /// `<prefix>/bin`
    pub bindir: PathBuf,
    /// `<prefix>/sbin`
    pub sbindir: PathBuf,
    /// `<prefix>/lib`
    pub libdir: PathBuf,
    /// `<prefix>/share`
    pub datadir: PathBuf,
    /// `<prefix>/share/doc`
    pub docdir: PathBuf,
    /// System configuration directory (`/etc`).
    pub sysconfdir: PathBuf,
    /// Variable state directory (`/var`).
    pub localstatedir: PathBuf,
    /// Init script directory, if the system has one.
    pub initscriptdir: Option<PathBuf>,
    /// Application directory (`<libdir>/vmware`).
    pub dest: PathBuf,
    /// CUPS library directory; `lib64/cups` when the system uses it.
    pub cupslibdir: PathBuf,
    /// Product configuration directory (`<sysconfdir>/vmware`).
    pub etcdir: PathBuf,
    /// Component payload directory.
    pub component_dir: PathBuf,
}

impl Layout {
    /// Derive the layout from configured roots, probing the filesystem for
    /// the CUPS library directory and the init script directory.
    #[must_use]
    pub fn resolve(paths: &Paths) -> Self {
        let prefix = paths.prefix.clone();
        let libdir = prefix.join("lib");
        let datadir = prefix.join("share");
        let sysconfdir = paths.sysconfdir.clone();

        let lib64_cups = prefix.join("lib64/cups");
        let cupslibdir = if lib64_cups.exists() {
            lib64_cups
        } else {
            libdir.join("cups")
        };

        let initscriptdir = paths.initscriptdir.clone().or_else(|| {
            [sysconfdir.join("init.d"), sysconfdir.join("rc.d/init.d")]
                .into_iter()
                .find(|dir| dir.is_dir())
        });

        Self {
            bindir: prefix.join("bin"),
            sbindir: prefix.join("sbin"),
            docdir: datadir.join("doc"),
            dest: libdir.join("vmware"),
            etcdir: sysconfdir.join("vmware"),
            localstatedir: paths.localstatedir.clone(),
            component_dir: paths.component_dir.clone(),
            prefix,
            libdir,
            datadir,
            sysconfdir,
            initscriptdir,
            cupslibdir,
        }
    }

    /// The external configuration command (`<dest>/setup/vmware-config`).
    #[must_use]
    pub fn config_tool(&self) -> PathBuf {
        self.dest.join("setup/vmware-config")
    }

    /// The shared launcher binary every product binary links to.
    #[must_use]
    pub fn app_loader(&self) -> PathBuf {
        self.dest.join("bin/appLoader")
    }

    /// The setuid disk-mount helper.
    #[must_use]
    pub fn mount_helper(&self) -> PathBuf {
        self.bindir.join("vmware-mount")
    }

    /// The generated desktop launcher.
    #[must_use]
    pub fn launcher(&self) -> PathBuf {
        self.datadir.join("applications/vmware-player.desktop")
    }

    /// The prelink configuration file.
    #[must_use]
    pub fn prelink_conf(&self) -> PathBuf {
        self.sysconfdir.join("prelink.conf")
    }

    /// The CUPS filter installed for virtual printing.
    #[must_use]
    pub fn cups_filter(&self) -> PathBuf {
        self.cupslibdir.join("filter/thnucups")
    }

    /// Help text shown next to the yes/no questions.
    #[must_use]
    pub fn learn_more(&self) -> PathBuf {
        self.component_dir.join("doc/LearnMore.txt")
    }

    /// An init script by name, if the system has an init script directory.
    #[must_use]
    pub fn init_script(&self, name: &str) -> Option<PathBuf> {
        self.initscriptdir.as_deref().map(|dir| dir.join(name))
    }

    /// Directory of a versioned installer payload.
    #[must_use]
    pub fn installer_dir(&self, version: &str) -> PathBuf {
        self.libdir.join("vmware-installer").join(version)
    }

    /// Binary a `vm://` link should open.
    #[must_use]
    pub fn url_handler_binary(&self, kind: super::ProductKind) -> PathBuf {
        match kind {
            super::ProductKind::Player => self.bindir.join("vmplayer"),
            super::ProductKind::Workstation => self.bindir.join("vmware"),
        }
    }
}
