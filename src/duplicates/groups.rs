//! Duplicate group and per-phase statistics types.

use std::path::PathBuf;

use crate::scanner::{digest_to_hex, Digest, FileRecord, HashError};

/// A group of files confirmed byte-identical by size and content digest.
///
/// Invariants: every member has the same `size` and the same `digest`, and a
/// group is only ever created with at least two members. Member order is the
/// source scan order.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Whole-file SHA-512 digest shared by all members.
    pub digest: Digest,
    /// Byte size shared by all members.
    pub size: u64,
    /// Member records, in scan order.
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bytes occupied by redundant copies (all members minus one).
    #[must_use]
    pub fn redundant_bytes(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }

    /// Digest as a hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// The member paths, in scan order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from Phase 1 (size bucketing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total records that entered Phase 1.
    pub total_files: usize,
    /// Records dropped because their path was already catalogued
    /// (overlapping sources).
    pub duplicate_paths: usize,
    /// Records left in surviving buckets (2+ members).
    pub candidate_files: usize,
    /// Number of surviving buckets.
    pub candidate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size bucketing alone.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            let eliminated = self.total_files - self.candidate_files;
            (eliminated as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Statistics from Phase 2 (digest confirmation).
#[derive(Debug, Default)]
pub struct ConfirmStats {
    /// Records whose digest was computed successfully.
    pub hashed_files: usize,
    /// Records dropped because their content could not be read.
    pub failed_files: usize,
    /// Errors encountered while digesting.
    pub errors: Vec<HashError>,
    /// Confirmed duplicate groups emitted.
    pub groups: usize,
    /// Total members across all confirmed groups.
    pub confirmed_files: usize,
}
