//! Two-phase duplicate grouping.
//!
//! # Overview
//!
//! Phase 1 partitions scanned records by exact byte size. Buckets with fewer
//! than two members cannot contain duplicates and are discarded before any
//! content is read; for typical trees this eliminates most files outright.
//!
//! Phase 2 digests every member of each surviving bucket and sub-partitions
//! by digest equality. Digest computation is parallelized across a bucket
//! with rayon as a pure optimization; grouping itself is sequential, so the
//! resulting membership is identical to the sequential algorithm and member
//! order stays in scan order. Groups are ordered by their earliest member,
//! so the same trees always confirm in the same order.
//!
//! # Example
//!
//! ```no_run
//! use treedupe::scanner::{IgnoreRules, Source, Walker};
//! use treedupe::duplicates::{confirm_groups, group_by_size};
//! use std::path::Path;
//!
//! let source = Source::new(Path::new("."), 0).unwrap();
//! let rules = IgnoreRules::default();
//! let records: Vec<_> = Walker::new(&source, &rules)
//!     .walk()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let (buckets, stats) = group_by_size(records);
//! println!("Phase 1 eliminated {:.1}% of files", stats.elimination_rate());
//!
//! let (groups, _) = confirm_groups(buckets);
//! println!("{} confirmed duplicate groups", groups.len());
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use rayon::prelude::*;

use crate::scanner::{Digest, FileRecord};

use super::{ConfirmStats, DuplicateGroup, GroupingStats};

/// Phase 1: bucket records by exact byte size.
///
/// Buckets preserve scan order. Only buckets with two or more members
/// survive; zero-byte records and records whose path was already catalogued
/// (overlapping sources) are dropped.
#[must_use]
pub fn group_by_size(records: Vec<FileRecord>) -> (HashMap<u64, Vec<FileRecord>>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: records.len(),
        ..Default::default()
    };

    let mut buckets: HashMap<u64, Vec<FileRecord>> = HashMap::new();
    let mut seen_paths: HashSet<PathBuf> = HashSet::new();

    for record in records {
        if record.size == 0 {
            continue;
        }
        if !seen_paths.insert(record.path.clone()) {
            stats.duplicate_paths += 1;
            continue;
        }
        buckets.entry(record.size).or_default().push(record);
    }

    buckets.retain(|_, bucket| bucket.len() > 1);

    stats.candidate_buckets = buckets.len();
    stats.candidate_files = buckets.values().map(Vec::len).sum();

    log::debug!(
        "Phase 1: {} files -> {} candidates in {} size buckets ({:.1}% eliminated)",
        stats.total_files,
        stats.candidate_files,
        stats.candidate_buckets,
        stats.elimination_rate()
    );

    (buckets, stats)
}

/// Phase 2: confirm size buckets by whole-file digest.
///
/// Every digest-equal sub-partition with two or more members becomes a
/// [`DuplicateGroup`]. Records that cannot be read are dropped from grouping
/// and reported in the returned [`ConfirmStats`]. Groups come back ordered
/// by their earliest member in scan order.
#[must_use]
pub fn confirm_groups(
    buckets: HashMap<u64, Vec<FileRecord>>,
) -> (Vec<DuplicateGroup>, ConfirmStats) {
    let mut stats = ConfirmStats::default();
    let mut groups = Vec::new();

    for (size, mut bucket) in buckets {
        // Parallel digest computation; collect() keeps bucket order.
        let digests: Vec<_> = bucket.par_iter_mut().map(FileRecord::digest).collect();

        let mut by_digest: HashMap<Digest, Vec<FileRecord>> = HashMap::new();
        for (record, result) in bucket.into_iter().zip(digests) {
            match result {
                Ok(digest) => {
                    stats.hashed_files += 1;
                    by_digest.entry(digest).or_default().push(record);
                }
                Err(e) => {
                    stats.failed_files += 1;
                    stats.errors.push(e);
                }
            }
        }

        for (digest, files) in by_digest {
            if files.len() > 1 {
                stats.groups += 1;
                stats.confirmed_files += files.len();
                groups.push(DuplicateGroup {
                    digest,
                    size,
                    files,
                });
            }
        }
    }

    // Bucket and digest maps iterate in arbitrary order; restore scan order
    // so sink output is stable across runs.
    groups.sort_by(|a, b| {
        let ka = (a.files[0].source, &a.files[0].path);
        let kb = (b.files[0].source, &b.files[0].path);
        ka.cmp(&kb)
    });

    log::debug!(
        "Phase 2: {} confirmed duplicate files in {} groups ({} unreadable)",
        stats.confirmed_files,
        stats.groups,
        stats.failed_files
    );

    (groups, stats)
}
