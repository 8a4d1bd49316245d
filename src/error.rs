//! Domain-specific error types for the installer component.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! InstallerError
//! ├── Config(ConfigError): configuration file loading
//! ├── Lifecycle(LifecycleError): required lifecycle steps that abort a phase
//! └── Detection(DetectionError): release file parsing
//! ```
//!
//! Resource-level failures live in [`crate::resources::error`].

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the installer component.
#[derive(Error, Debug)]
pub enum InstallerError {
    /// Configuration-related error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required lifecycle step failed.
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),

    /// System detection failed.
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),
}

/// Errors that arise while loading the installer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the installer schema.
    #[error("Invalid config file {path}: {message}")]
    Invalid {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Failures of steps declared as required; these abort the lifecycle transition.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The disk-mount helper could not unmount every virtual disk.
    #[error(
        "Some virtual disks could not be unmounted.  Make sure that all files opened on all \
         virtual disks are closed and then run this installer again."
    )]
    DisksStillMounted {
        /// Exit code reported by the mount helper.
        exit_code: i32,
    },

    /// A required step failed for another reason.
    #[error("Required step '{step}' failed: {reason}")]
    RequiredStepFailed {
        /// Name of the step.
        step: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors from parsing a release file that was recognised but malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// A marker identified the distribution but an expected field was absent.
    #[error("{distro} release file is missing the {field} field")]
    MissingField {
        /// Distribution the marker identified.
        distro: String,
        /// Field that could not be extracted.
        field: &'static str,
    },
}
