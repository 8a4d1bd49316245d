//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations. Internal resource code returns these
//! variants through [`anyhow::Error`]; callers can downcast when they need
//! to tell a conflict apart from an I/O failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A file holds more than one managed block, so the one to edit is
    /// ambiguous.
    #[error("{path} contains {blocks} managed blocks; expected at most one")]
    MultipleSentinelBlocks {
        /// File being edited.
        path: PathBuf,
        /// Number of complete blocks found.
        blocks: usize,
    },

    /// A file holds an odd number of sentinel markers.
    #[error("{path} contains an unterminated managed block ({markers} marker lines)")]
    UnbalancedSentinel {
        /// File being edited.
        path: PathBuf,
        /// Number of marker lines found.
        markers: usize,
    },

    /// A resource exists but is in an unexpected or inconsistent state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or description of the resource in the invalid state.
        resource: String,
        /// Human-readable explanation of why the state is invalid.
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn multiple_blocks_display() {
        let e = ResourceError::MultipleSentinelBlocks {
            path: PathBuf::from("/etc/prelink.conf"),
            blocks: 2,
        };
        assert_eq!(
            e.to_string(),
            "/etc/prelink.conf contains 2 managed blocks; expected at most one"
        );
    }

    #[test]
    fn unbalanced_display() {
        let e = ResourceError::UnbalancedSentinel {
            path: PathBuf::from("/etc/modules"),
            markers: 1,
        };
        assert!(e.to_string().contains("unterminated"));
        assert!(e.to_string().contains("/etc/modules"));
    }

    #[test]
    fn invalid_state_display() {
        let e = ResourceError::InvalidState {
            resource: "/usr/bin/vmware-uninstall".to_string(),
            reason: "path is a directory".to_string(),
        };
        assert!(e.to_string().contains("vmware-uninstall"));
        assert!(e.to_string().contains("path is a directory"));
    }

    #[test]
    fn resource_error_downcasts_from_anyhow() {
        let e: anyhow::Error = ResourceError::UnbalancedSentinel {
            path: PathBuf::from("f"),
            markers: 3,
        }
        .into();
        assert!(e.downcast_ref::<ResourceError>().is_some());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resource_error_is_send_sync() {
        assert_send_sync::<ResourceError>();
    }
}
