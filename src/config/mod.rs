//! Typed installer configuration.
//!
//! One [`InstallerConfig`] is loaded at the start of every lifecycle phase
//! from an optional TOML file. Every key the hooks consult is a named field
//! here; a missing file or missing section falls back to defaults.
pub mod layout;
pub mod questions;
pub mod targets;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A yes/no answer as stored by the configuration command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    /// `yes`
    Yes,
    /// `no`
    No,
}

impl YesNo {
    /// The literal written to the settings store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers recorded by the transaction engine for this component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Answers {
    /// Check for product updates on startup. `None` if never answered.
    pub software_update_enabled: Option<YesNo>,
    /// Send anonymous usage statistics. `None` if never answered.
    pub data_collection_enabled: Option<YesNo>,
    /// Simplified UI flag handed through to the product.
    pub simplified_ui: Option<String>,
    /// Support URL handed through to the product.
    pub support_url: Option<String>,
    /// Update server used for component downloads.
    pub software_update_url: Option<String>,
}

/// Installer-wide settings shared with sibling components.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    /// Install desktop shortcuts and app-launcher metadata.
    pub install_shortcuts: bool,
    /// Keep `/etc/vmware` configuration when uninstalling.
    pub keep_config_on_uninstall: bool,
    /// Installer version; names the directory holding the downgrade uninstaller.
    pub version: String,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            install_shortcuts: true,
            keep_config_on_uninstall: false,
            version: "2.1.0".to_string(),
        }
    }
}

/// Values from the component manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Product build number.
    pub build_number: String,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            build_number: "0".to_string(),
        }
    }
}

/// Which product this component is installed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Player is the product being installed.
    #[default]
    Player,
    /// The component ships inside Workstation.
    Workstation,
}

/// Product section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Product {
    /// Installed product.
    pub kind: ProductKind,
}

/// Filesystem roots. Everything else is derived in [`layout::Layout`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    /// Installation prefix (`/usr`).
    pub prefix: PathBuf,
    /// System configuration directory (`/etc`).
    pub sysconfdir: PathBuf,
    /// Variable state directory (`/var`).
    pub localstatedir: PathBuf,
    /// Init script directory; detected when unset.
    pub initscriptdir: Option<PathBuf>,
    /// Directory holding the component payload (`doc/`, `bin/`, ...).
    pub component_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            prefix: PathBuf::from("/usr"),
            sysconfdir: PathBuf::from("/etc"),
            localstatedir: PathBuf::from("/var"),
            initscriptdir: None,
            component_dir: PathBuf::from("."),
        }
    }
}

/// All configuration for one lifecycle phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Recorded answers.
    pub answers: Answers,
    /// Installer-wide settings.
    pub installer: InstallerSettings,
    /// Manifest values.
    pub manifest: Manifest,
    /// Product selection.
    pub product: Product,
    /// Filesystem roots.
    pub paths: Paths,
}

impl InstallerConfig {
    /// Load the configuration from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the parser message if `content` is not valid for the schema.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = InstallerConfig::from_toml("").unwrap();
        assert_eq!(config, InstallerConfig::default());
        assert!(config.installer.install_shortcuts);
        assert!(!config.installer.keep_config_on_uninstall);
        assert_eq!(config.manifest.build_number, "0");
        assert_eq!(config.product.kind, ProductKind::Player);
    }

    #[test]
    fn parses_all_sections() {
        let config = InstallerConfig::from_toml(
            r#"
[answers]
software_update_enabled = "no"
data_collection_enabled = "yes"
support_url = "https://example.com/support"

[installer]
install_shortcuts = false
keep_config_on_uninstall = true
version = "2.1.0"

[manifest]
build_number = "1234567"

[product]
kind = "workstation"

[paths]
prefix = "/opt/usr"
"#,
        )
        .unwrap();
        assert_eq!(config.answers.software_update_enabled, Some(YesNo::No));
        assert_eq!(config.answers.data_collection_enabled, Some(YesNo::Yes));
        assert_eq!(config.answers.simplified_ui, None);
        assert!(!config.installer.install_shortcuts);
        assert!(config.installer.keep_config_on_uninstall);
        assert_eq!(config.manifest.build_number, "1234567");
        assert_eq!(config.product.kind, ProductKind::Workstation);
        assert_eq!(config.paths.prefix, PathBuf::from("/opt/usr"));
        assert_eq!(config.paths.sysconfdir, PathBuf::from("/etc"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = InstallerConfig::from_toml("[installer]\ninstall_shortcut = true\n").unwrap_err();
        assert!(err.contains("install_shortcut"), "unexpected message: {err}");
    }

    #[test]
    fn invalid_answer_is_rejected() {
        assert!(InstallerConfig::from_toml("[answers]\nsoftware_update_enabled = \"maybe\"\n").is_err());
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = InstallerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, InstallerConfig::default());
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.toml");
        std::fs::write(&path, "[answers\n").unwrap();
        let err = InstallerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("player.toml"));
    }

    #[test]
    fn yes_no_display() {
        assert_eq!(YesNo::Yes.to_string(), "yes");
        assert_eq!(YesNo::No.as_str(), "no");
    }
}
