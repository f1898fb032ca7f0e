//! Depth-first directory traversal for a single source tree.
//!
//! The walk visits entries in sorted directory-listing order so that scan
//! output is deterministic across runs, which in turn makes group membership
//! order and resolution auditable. Symbolic links are never followed.
//!
//! Ignore rules apply to every entry name below the root; the source root
//! itself is exempt, so a source whose directory happens to be named like an
//! ignored entry is still scanned.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use super::{FileRecord, IgnoreRules, ScanError, Source};

/// Directory walker producing [`FileRecord`]s for one [`Source`].
///
/// Emits a record for every non-ignored, non-zero-byte regular file.
/// Unreadable entries are yielded as [`ScanError`]s rather than stopping
/// iteration; the caller decides how to surface them.
#[derive(Debug)]
pub struct Walker<'a> {
    source: &'a Source,
    rules: &'a IgnoreRules,
}

impl<'a> Walker<'a> {
    /// Create a walker for the given source and ignore rules.
    #[must_use]
    pub fn new(source: &'a Source, rules: &'a IgnoreRules) -> Self {
        Self { source, rules }
    }

    /// Walk the source tree lazily, in sorted depth-first order.
    ///
    /// Ignored directories are pruned without descending into them.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + 'a {
        let rules = self.rules;
        let root = self.source.root.clone();
        let ordinal = self.source.ordinal;

        WalkDir::new(&self.source.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            // Depth 0 is the source root itself, which is never ignore-matched.
            .filter_entry(move |entry| {
                entry.depth() == 0 || !rules.matches(&entry.file_name().to_string_lossy())
            })
            .filter_map(move |result| {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e
                            .path()
                            .map_or_else(|| root.clone(), Path::to_path_buf);
                        return Some(Err(ScanError::Unreadable { path, source: e }));
                    }
                };

                // Symlinks are not followed; directories are handled by recursion.
                if !entry.file_type().is_file() {
                    return None;
                }

                let path = entry.path().to_path_buf();
                let metadata = match entry.metadata() {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        let source = match e.into_io_error() {
                            Some(io_err) => io_err,
                            None => io::Error::other("metadata unavailable"),
                        };
                        return Some(Err(ScanError::Metadata { path, source }));
                    }
                };

                // Zero-byte files are never duplicate candidates.
                if metadata.len() == 0 {
                    return None;
                }

                let modified = match metadata.modified() {
                    Ok(modified) => modified,
                    Err(source) => return Some(Err(ScanError::Metadata { path, source })),
                };

                let relative = path
                    .strip_prefix(&root)
                    .unwrap_or(&path)
                    .to_path_buf();

                Some(Ok(FileRecord::new(
                    path,
                    ordinal,
                    relative,
                    metadata.len(),
                    modified,
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn scan(root: &Path, rules: &IgnoreRules) -> Vec<FileRecord> {
        let source = Source::new(root, 0).unwrap();
        Walker::new(&source, rules)
            .walk()
            .filter_map(Result::ok)
            .collect()
    }

    fn relative_paths(records: &[FileRecord]) -> Vec<PathBuf> {
        records.iter().map(|r| r.relative.clone()).collect()
    }

    #[test]
    fn test_walk_emits_files_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", b"b");
        write(dir.path(), "a.txt", b"a");
        write(dir.path(), "sub/c.txt", b"c");

        let records = scan(dir.path(), &IgnoreRules::empty());
        assert_eq!(
            relative_paths(&records),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub/c.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_skips_zero_byte_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty.txt", b"");
        write(dir.path(), "full.txt", b"data");

        let records = scan(dir.path(), &IgnoreRules::empty());
        assert_eq!(relative_paths(&records), vec![PathBuf::from("full.txt")]);
    }

    #[test]
    fn test_walk_prunes_ignored_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".git/objects/blob", b"blob");
        write(dir.path(), "kept.txt", b"kept");

        let records = scan(dir.path(), &IgnoreRules::default());
        assert_eq!(relative_paths(&records), vec![PathBuf::from("kept.txt")]);
    }

    #[test]
    fn test_walk_skips_ignored_file_names() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".DS_Store", b"mac");
        write(dir.path(), "._photo.jpg", b"fork");
        write(dir.path(), "photo.jpg", b"jpeg");

        let records = scan(dir.path(), &IgnoreRules::default());
        assert_eq!(relative_paths(&records), vec![PathBuf::from("photo.jpg")]);
    }

    #[test]
    fn test_empty_rules_scan_everything() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".git/config", b"cfg");

        let records = scan(dir.path(), &IgnoreRules::empty());
        assert_eq!(relative_paths(&records), vec![PathBuf::from(".git/config")]);
    }

    #[test]
    fn test_source_root_name_is_exempt_from_ignore() {
        let dir = TempDir::new().unwrap();
        // A source rooted at a directory named ".git" is still scanned;
        // only its contents are subject to matching.
        write(dir.path(), ".git/inner.txt", b"inner");

        let records = scan(&dir.path().join(".git"), &IgnoreRules::default());
        assert_eq!(relative_paths(&records), vec![PathBuf::from("inner.txt")]);
    }

    #[test]
    fn test_records_carry_source_ordinal_and_size() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "f.txt", b"12345");

        let source = Source::new(dir.path(), 3).unwrap();
        let records: Vec<_> = Walker::new(&source, &IgnoreRules::empty())
            .walk()
            .filter_map(Result::ok)
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, 3);
        assert_eq!(records[0].size, 5);
        assert!(records[0].path.is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "real/target.txt", b"target");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linked")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("real/target.txt"),
            dir.path().join("direct.txt"),
        )
        .unwrap();

        let records = scan(dir.path(), &IgnoreRules::empty());
        assert_eq!(
            relative_paths(&records),
            vec![PathBuf::from("real/target.txt")]
        );
    }
}
