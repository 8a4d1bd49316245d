//! Sentinel-delimited managed blocks inside user-owned text files.
//!
//! A managed block is the inserted text wrapped between two identical marker
//! lines. A file holds at most one block: inserting again replaces the
//! existing block, and removing deletes exactly the bytes that were added so
//! the original content is restored verbatim.
use anyhow::{Context as _, Result};
use std::ops::Range;
use std::path::Path;

use super::error::ResourceError;
use super::helpers::fs::write_atomic;
use crate::logging::Log;

/// Marker line that opens and closes a managed block.
pub const SENTINEL: &str = "# Automatically generated by the VMware Installer - DO NOT REMOVE\n";

/// Where a new block goes relative to the existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the existing content.
    Append,
    /// Before the existing content.
    Prepend,
}

/// Insert `text` as the managed block of `file`.
///
/// An existing block is removed first, so repeated inserts never stack.
/// Returns `Ok(false)` without touching anything when `file` does not exist.
///
/// # Errors
///
/// Returns [`ResourceError`] if the file holds more than one block or an
/// unterminated one, or an I/O error if it cannot be read or rewritten.
pub fn insert(file: &Path, text: &str, placement: Placement, log: &dyn Log) -> Result<bool> {
    let Some(mut content) = read_existing(file, log)? else {
        return Ok(false);
    };
    if let Some(range) = find_block(file, &content)? {
        content.drain(range);
    }

    let mut block = Vec::with_capacity(SENTINEL.len() * 2 + text.len() + 1);
    block.extend_from_slice(SENTINEL.as_bytes());
    block.extend_from_slice(text.as_bytes());
    block.push(b'\n');
    block.extend_from_slice(SENTINEL.as_bytes());

    let updated = match placement {
        Placement::Append => [content, block].concat(),
        Placement::Prepend => [block, content].concat(),
    };
    write_atomic(file, &updated)?;
    Ok(true)
}

/// Remove the managed block from `file`.
///
/// A file without a block is left untouched. Returns `Ok(false)` when `file`
/// does not exist and `Ok(true)` otherwise.
///
/// # Errors
///
/// Returns [`ResourceError`] if the file holds more than one block or an
/// unterminated one, or an I/O error if it cannot be read or rewritten.
pub fn remove(file: &Path, log: &dyn Log) -> Result<bool> {
    let Some(mut content) = read_existing(file, log)? else {
        return Ok(false);
    };
    if let Some(range) = find_block(file, &content)? {
        content.drain(range);
        write_atomic(file, &content)?;
    }
    Ok(true)
}

/// Whether `file` currently holds a managed block.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or its markers are
/// inconsistent.
pub fn has_block(file: &Path) -> Result<bool> {
    if !file.exists() {
        return Ok(false);
    }
    let content = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
    Ok(find_block(file, &content)?.is_some())
}

fn read_existing(file: &Path, log: &dyn Log) -> Result<Option<Vec<u8>>> {
    if !file.exists() {
        log.info(&format!(
            "Attempted to modify file {}, does not exist.",
            file.display()
        ));
        return Ok(None);
    }
    std::fs::read(file)
        .map(Some)
        .with_context(|| format!("read {}", file.display()))
}

/// Byte range of the single managed block, markers included.
fn find_block(file: &Path, content: &[u8]) -> Result<Option<Range<usize>>, ResourceError> {
    let markers = marker_offsets(content);
    match markers.as_slice() {
        [] => Ok(None),
        [open, close] => Ok(Some(*open..close + SENTINEL.len())),
        many if many.len() % 2 == 1 => Err(ResourceError::UnbalancedSentinel {
            path: file.to_path_buf(),
            markers: many.len(),
        }),
        many => Err(ResourceError::MultipleSentinelBlocks {
            path: file.to_path_buf(),
            blocks: many.len() / 2,
        }),
    }
}

fn marker_offsets(content: &[u8]) -> Vec<usize> {
    let needle = SENTINEL.as_bytes();
    let mut offsets = Vec::new();
    let mut start = 0;
    while let Some(rest) = content.get(start..) {
        match rest.windows(needle.len()).position(|w| w == needle) {
            Some(pos) => {
                offsets.push(start + pos);
                start += pos + needle.len();
            }
            None => break,
        }
    }
    offsets
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    fn file_with(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn append_wraps_text_in_markers() {
        let (log, _tmp, _guard) = isolated_logger();
        let (_dir, path) = file_with(b"loop\n");
        assert!(insert(&path, "vmmon", Placement::Append, &log).unwrap());
        let expected = format!("loop\n{SENTINEL}vmmon\n{SENTINEL}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn prepend_puts_block_first() {
        let (log, _tmp, _guard) = isolated_logger();
        let (_dir, path) = file_with(b"loop\n");
        insert(&path, "vmmon", Placement::Prepend, &log).unwrap();
        let expected = format!("{SENTINEL}vmmon\n{SENTINEL}loop\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn insert_then_remove_restores_original_bytes() {
        let (log, _tmp, _guard) = isolated_logger();
        let original: &[u8] = b"# keep me\r\nno trailing newline \xff";
        for placement in [Placement::Append, Placement::Prepend] {
            let (_dir, path) = file_with(original);
            insert(&path, "-b /usr/lib/vmware/bin/appLoader", placement, &log).unwrap();
            assert!(remove(&path, &log).unwrap());
            assert_eq!(std::fs::read(&path).unwrap(), original);
        }
    }

    #[test]
    fn repeated_insert_replaces_block() {
        let (log, _tmp, _guard) = isolated_logger();
        let (_dir, path) = file_with(b"base\n");
        insert(&path, "first", Placement::Append, &log).unwrap();
        insert(&path, "second", Placement::Append, &log).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches(SENTINEL).count(), 2);
        assert!(!content.contains("first"));
        assert!(content.contains("second"));
        remove(&path, &log).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "base\n");
    }

    #[test]
    fn remove_without_block_leaves_bytes_unchanged() {
        let (log, _tmp, _guard) = isolated_logger();
        let (_dir, path) = file_with(b"untouched\n");
        assert!(remove(&path, &log).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"untouched\n");
    }

    #[test]
    fn missing_file_returns_false() {
        let (log, _tmp, _guard) = isolated_logger();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        assert!(!remove(&path, &log).unwrap());
        assert!(!insert(&path, "x", Placement::Append, &log).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn multiple_blocks_are_rejected() {
        let (log, _tmp, _guard) = isolated_logger();
        let content = format!("{SENTINEL}a\n{SENTINEL}mid\n{SENTINEL}b\n{SENTINEL}");
        let (_dir, path) = file_with(content.as_bytes());
        let err = remove(&path, &log).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::MultipleSentinelBlocks { blocks: 2, .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn unterminated_block_is_rejected() {
        let (log, _tmp, _guard) = isolated_logger();
        let content = format!("x\n{SENTINEL}dangling\n");
        let (_dir, path) = file_with(content.as_bytes());
        let err = insert(&path, "y", Placement::Append, &log).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::UnbalancedSentinel { markers: 1, .. })
        ));
    }

    #[test]
    fn has_block_reflects_state() {
        let (log, _tmp, _guard) = isolated_logger();
        let (_dir, path) = file_with(b"");
        assert!(!has_block(&path).unwrap());
        insert(&path, "x", Placement::Append, &log).unwrap();
        assert!(has_block(&path).unwrap());
    }

    #[test]
    fn marker_offsets_finds_all() {
        let content = format!("a{SENTINEL}b{SENTINEL}");
        assert_eq!(marker_offsets(content.as_bytes()), vec![1, 2 + SENTINEL.len()]);
    }
}
