//! Linux distribution detection from well-known release files.
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::DetectionError;
use crate::logging::Log;

/// Release files in scan order. When several exist the last one wins:
/// SuSE systems ship an `lsb-release` too, but `SuSE-release` is authoritative.
pub const RELEASE_FILES: [&str; 4] = [
    "lsb-release",
    "redhat-release",
    "SuSE-release",
    "fedora-release",
];

#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("release file pattern must compile")
}

static UBUNTU_VERSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"DISTRIB_RELEASE=(\d+\.\d+)"));
static RHEL_VERSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"elease (\d+\.\d+)"));
static RHEL_VARIANT: LazyLock<Regex> = LazyLock::new(|| pattern(r"Enterprise Linux (\w+)"));
static SLE_VERSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"VERSION = (\d+)"));
static SLE_VARIANT: LazyLock<Regex> = LazyLock::new(|| pattern(r"Enterprise (\w+) "));
static FEDORA_VERSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"Fedora release (\d+)"));

/// Distributions the installer knows how to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Distro {
    /// Ubuntu (`DISTRIB_ID=Ubuntu` in `lsb-release`).
    Ubuntu,
    /// Red Hat Enterprise Linux.
    #[serde(rename = "RHEL")]
    Rhel,
    /// SUSE Linux Enterprise.
    #[serde(rename = "SLE")]
    Sle,
    /// Fedora.
    Fedora,
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ubuntu => write!(f, "Ubuntu"),
            Self::Rhel => write!(f, "RHEL"),
            Self::Sle => write!(f, "SLE"),
            Self::Fedora => write!(f, "Fedora"),
        }
    }
}

/// Normalised identity of the running system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemIdentity {
    /// Distribution family.
    pub distro: Distro,
    /// Release version (e.g. `"20.04"`, `"6.5"`, `"11"`).
    pub version: String,
    /// Edition such as `"Server"` or `"Desktop"`; empty where not applicable.
    pub variant: String,
}

/// Outcome of [`detect`]. Detection never fails the caller; degraded
/// outcomes are spelled out instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// A supported distribution was recognised and fully parsed.
    Identified(SystemIdentity),
    /// No release file exists (or all are empty).
    NoReleaseFile,
    /// A release file exists but matches no supported distribution.
    Unrecognized,
    /// The distribution was recognised but a field could not be extracted.
    Failed {
        /// Distribution the marker identified.
        distro: Distro,
        /// What went wrong.
        error: DetectionError,
    },
}

impl Detection {
    /// Flatten into a nullable `(name, version, variant)` triple.
    ///
    /// A failed parse keeps the distribution name and drops the rest.
    #[must_use]
    pub fn triple(&self) -> (Option<String>, Option<String>, Option<String>) {
        match self {
            Self::Identified(id) => (
                Some(id.distro.to_string()),
                Some(id.version.clone()),
                Some(id.variant.clone()),
            ),
            Self::Failed { distro, .. } => (Some(distro.to_string()), None, None),
            Self::NoReleaseFile | Self::Unrecognized => (None, None, None),
        }
    }
}

/// Read the release files under `etc_dir` and identify the system.
///
/// Recomputed on every call; nothing is cached.
#[must_use]
pub fn detect(etc_dir: &Path, log: &dyn Log) -> Detection {
    let mut text = String::new();
    for name in RELEASE_FILES {
        let path = etc_dir.join(name);
        if !path.exists() {
            continue;
        }
        match std::fs::read(&path) {
            Ok(bytes) => text = String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => log.debug(&format!("cannot read {}: {e}", path.display())),
        }
    }

    if text.is_empty() {
        log.warn("No release file found...");
        return Detection::NoReleaseFile;
    }

    match parse_release(&text) {
        Ok(Some(id)) => Detection::Identified(id),
        Ok(None) => Detection::Unrecognized,
        Err((distro, error)) => {
            log.warn(&format!("Could not determine system type: {error}"));
            log.warn_text("Found text reads:", &text);
            Detection::Failed { distro, error }
        }
    }
}

/// Identify the distribution described by release file `text`.
///
/// Markers are tried in order Ubuntu, RHEL, SLE, Fedora; the first hit wins.
/// Returns `Ok(None)` when no marker matches.
///
/// # Errors
///
/// Returns the recognised distribution together with the field that could
/// not be extracted.
pub fn parse_release(text: &str) -> Result<Option<SystemIdentity>, (Distro, DetectionError)> {
    let (distro, version, variant) = if text.contains("DISTRIB_ID=Ubuntu") {
        (Distro::Ubuntu, capture(&UBUNTU_VERSION, text), Some(String::new()))
    } else if text.contains("Red Hat Enterprise Linux") {
        (
            Distro::Rhel,
            capture(&RHEL_VERSION, text),
            capture(&RHEL_VARIANT, text),
        )
    } else if text.contains("SUSE Linux Enterprise") {
        (
            Distro::Sle,
            capture(&SLE_VERSION, text),
            capture(&SLE_VARIANT, text),
        )
    } else if text.contains("Fedora release") {
        (Distro::Fedora, capture(&FEDORA_VERSION, text), Some(String::new()))
    } else {
        return Ok(None);
    };

    let missing = |field| {
        (
            distro,
            DetectionError::MissingField {
                distro: distro.to_string(),
                field,
            },
        )
    };
    let version = version.ok_or_else(|| missing("version"))?;
    let variant = variant.ok_or_else(|| missing("variant"))?;

    Ok(Some(SystemIdentity {
        distro,
        version,
        variant,
    }))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
