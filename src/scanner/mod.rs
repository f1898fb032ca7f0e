//! Scanner module: source trees, file records, and directory traversal.
//!
//! The scanner turns one or more user-supplied [`Source`] roots into a flat,
//! ordered stream of [`FileRecord`]s. Submodules:
//!
//! - [`walker`]: depth-first, sorted directory traversal per source
//! - [`hasher`]: streaming SHA-512 content digests
//!
//! # Example
//!
//! ```no_run
//! use treedupe::scanner::{IgnoreRules, Source, Walker};
//! use std::path::Path;
//!
//! let source = Source::new(Path::new("/photos/archive"), 0).unwrap();
//! let rules = IgnoreRules::default();
//! for entry in Walker::new(&source, &rules).walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regex::Regex;

pub use hasher::{digest_to_hex, Digest};
pub use walker::Walker;

/// One user-specified directory tree to scan.
///
/// Sources are order-significant: the `ordinal` is the position of the root
/// on the command line, and order-based resolution prefers lower ordinals.
/// Immutable once scanning starts.
#[derive(Debug, Clone)]
pub struct Source {
    /// Canonicalized root path of the tree.
    pub root: PathBuf,
    /// 0-based position among the configured sources.
    pub ordinal: usize,
}

impl Source {
    /// Create a source for the given root, canonicalizing the path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] if the path does not exist and
    /// [`ScanError::NotADirectory`] if it is not a directory.
    pub fn new(root: &Path, ordinal: usize) -> Result<Self, ScanError> {
        let root = root
            .canonicalize()
            .map_err(|_| ScanError::NotFound(root.to_path_buf()))?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root));
        }
        Ok(Self { root, ordinal })
    }
}

/// One scanned regular file.
///
/// Size and modification time are captured at scan time; the content digest
/// is computed lazily via [`FileRecord::digest`] and memoized, so it is never
/// recomputed within one run.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Ordinal of the owning [`Source`].
    pub source: usize,
    /// Path relative to the owning source's root.
    pub relative: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Memoized content digest, present once computed.
    digest: Option<Digest>,
}

impl FileRecord {
    /// Create a new record for a file discovered under a source.
    #[must_use]
    pub fn new(
        path: PathBuf,
        source: usize,
        relative: PathBuf,
        size: u64,
        modified: SystemTime,
    ) -> Self {
        Self {
            path,
            source,
            relative,
            size,
            modified,
            digest: None,
        }
    }

    /// Number of path components between the source root and the file.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }

    /// The file's name, lossily converted for pattern matching.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Content digest of the file, computing and memoizing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read.
    pub fn digest(&mut self) -> Result<Digest, HashError> {
        if let Some(digest) = self.digest {
            return Ok(digest);
        }
        let digest = hasher::digest_file(&self.path)?;
        log::trace!(
            "Digest {} for {}",
            digest_to_hex(&digest),
            self.path.display()
        );
        self.digest = Some(digest);
        Ok(digest)
    }

    /// The already-computed digest, if any.
    #[must_use]
    pub fn cached_digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }
}

/// Names and patterns of directory entries to skip during scanning.
///
/// An entry whose name equals a literal name or matches one of the patterns
/// is skipped entirely; a matching directory is not descended into. The
/// source root itself is never subject to matching, only its contents.
///
/// [`IgnoreRules::default`] supplies the built-in set (`.hg`, `.git`, Mac OS
/// metadata files). Loading any configuration replaces the defaults wholesale.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    names: Vec<String>,
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    /// Create rules from literal names and compiled patterns.
    #[must_use]
    pub fn new(names: Vec<String>, patterns: Vec<Regex>) -> Self {
        Self { names, patterns }
    }

    /// Rules that ignore nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Whether an entry with this name should be skipped.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name) || self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Number of literal names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Number of patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        let patterns = ["^\\.DS_Store$", "^\\._"]
            .iter()
            .map(|p| Regex::new(p).expect("built-in ignore pattern is valid"))
            .collect();
        Self::new(vec![".hg".to_string(), ".git".to_string()], patterns)
    }
}

/// Errors that can occur during directory scanning.
///
/// Apart from source validation, these are surfaced as warnings: an entry
/// that becomes unreadable mid-scan is skipped, not fatal to the run.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A directory entry could not be read during traversal.
    #[error("unreadable entry {path}: {source}")]
    Unreadable {
        /// Path where the error occurred, as far as it is known.
        path: PathBuf,
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// File metadata could not be read.
    #[error("metadata unavailable for {path}: {source}")]
    Metadata {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while digesting file content.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
