// src/download/dirs.rs
// =============================================================================
// This module builds the local directory skeleton before any file download.
//
// Why up front?
// - Downloads run in parallel, and several files can share a parent
//   directory; creating everything first means no worker ever races
//   another worker (or loses to a missing directory)
//
// Manifest paths are joined onto the destination segment by segment, so
// the mirrored tree uses the local platform's separators. Paths with ".."
// or empty segments are refused - a manifest must never be able to write
// outside the destination root.
//
// Rust concepts:
// - PathBuf::push: Platform-aware path building
// - Iterators over &str: Splitting the slash-separated manifest paths
// - std::fs: Plain blocking filesystem calls (this stage is sequential)
// =============================================================================

use crate::errors::{fs_error, FetchError};
use crate::github::TreeEntry;
use std::fs;
use std::path::{Path, PathBuf};

// Maps a slash-separated manifest path onto a local path under `root`
//
// Returns None for paths we refuse to touch: empty ones, or ones with
// empty / "." / ".." segments (those could escape the destination).
pub fn local_destination(root: &Path, relative: &str) -> Option<PathBuf> {
    if relative.is_empty() {
        return None;
    }

    let mut destination = root.to_path_buf();
    for segment in relative.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
        destination.push(segment);
    }
    Some(destination)
}

// Creates every directory the manifest implies, before any file is written
//
// Covers both explicit directory entries and the parent chain of every
// file entry (create_dir_all handles intermediate segments and is
// idempotent, so re-runs are safe).
//
// Parameters:
//   entries: the full manifest
//   root: the destination directory
//
// Returns: how many explicit directory entries were materialized (for the
// final summary), or a fatal Filesystem error.
pub fn materialize_dirs(entries: &[TreeEntry], root: &Path) -> Result<usize, FetchError> {
    fs::create_dir_all(root).map_err(|e| fs_error(e, root))?;

    let mut created = 0;

    for entry in entries {
        // Submodule pointers get no local representation
        if !entry.is_dir() && !entry.is_file() {
            continue;
        }

        let target = if entry.is_dir() {
            local_destination(root, &entry.path)
        } else {
            // For files we only need the parent directory to exist
            local_destination(root, &entry.path).and_then(|p| p.parent().map(Path::to_path_buf))
        };

        let Some(target) = target else {
            eprintln!("⚠️  Skipping unsafe manifest path: {}", entry.path);
            continue;
        };

        fs::create_dir_all(&target).map_err(|e| fs_error(e, &target))?;
        if entry.is_dir() {
            created += 1;
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::TreeKind;
    use tempfile::tempdir;

    fn entry(path: &str, kind: TreeKind) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind,
            size: None,
        }
    }

    #[test]
    fn test_local_destination_joins_segments() {
        let root = Path::new("out");
        let dest = local_destination(root, "a/b/c.txt").unwrap();
        assert_eq!(dest, Path::new("out").join("a").join("b").join("c.txt"));
    }

    #[test]
    fn test_local_destination_rejects_traversal() {
        let root = Path::new("out");
        assert_eq!(local_destination(root, "../evil.txt"), None);
        assert_eq!(local_destination(root, "a/../../evil.txt"), None);
        assert_eq!(local_destination(root, "/etc/passwd"), None); // leading slash -> empty segment
        assert_eq!(local_destination(root, ""), None);
        assert_eq!(local_destination(root, "a/./b"), None);
    }

    #[test]
    fn test_materialize_creates_nested_directories() {
        let temp = tempdir().unwrap();
        let manifest = vec![
            entry("a", TreeKind::Tree),
            entry("a/b", TreeKind::Tree),
            entry("a/b/c.txt", TreeKind::Blob),
        ];

        let created = materialize_dirs(&manifest, temp.path()).unwrap();

        // Every directory a file write will need exists already
        assert!(temp.path().join("a").is_dir());
        assert!(temp.path().join("a").join("b").is_dir());
        assert_eq!(created, 2);
    }

    #[test]
    fn test_materialize_covers_implied_parents() {
        // Some manifests list files whose parent has no explicit tree row
        let temp = tempdir().unwrap();
        let manifest = vec![entry("src/deep/main.rs", TreeKind::Blob)];

        materialize_dirs(&manifest, temp.path()).unwrap();

        assert!(temp.path().join("src").join("deep").is_dir());
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let temp = tempdir().unwrap();
        let manifest = vec![entry("a", TreeKind::Tree), entry("a/f.txt", TreeKind::Blob)];

        materialize_dirs(&manifest, temp.path()).unwrap();
        materialize_dirs(&manifest, temp.path()).unwrap();

        assert!(temp.path().join("a").is_dir());
    }

    #[test]
    fn test_materialize_skips_submodules_and_unsafe_paths() {
        let temp = tempdir().unwrap();
        let manifest = vec![
            entry("vendored", TreeKind::Commit),
            entry("../outside", TreeKind::Tree),
        ];

        let created = materialize_dirs(&manifest, temp.path()).unwrap();

        assert_eq!(created, 0);
        assert!(!temp.path().join("vendored").exists());
    }
}
