//! Resolver strategies for reducing a duplicate group to one original.
//!
//! A [`Resolver`] is one of a closed set of strategies applied in configured
//! order to a group's candidate set:
//!
//! - Sort-based (`path-depth`, `source-order`, `mod-date`): rank candidates
//!   by a key and keep only the extremal-key members, ascending or
//!   descending. Ties pass through whole.
//! - `copy-pattern`: drop candidates whose file name looks like a copy,
//!   unless that would drop every candidate.
//! - `interactive`: defer the decision to a [`prompt::Prompt`] collaborator.
//! - `arbitrary`: pick the lexicographically smallest path; never fails,
//!   intended as a chain terminator.
//!
//! New strategies extend the variant set; dispatch stays in
//! [`Resolver::apply`].

pub mod chain;
pub mod prompt;

use std::io;
use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::FileRecord;

pub use chain::{resolve_group, GroupResolution, Outcome};
pub use prompt::{Decision, Prompt, TerminalPrompt};

/// Sort direction for sort-based resolvers.
///
/// Ascending prefers the smallest key (fewest path components, lowest source
/// ordinal, oldest modification time); descending prefers the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Prefer the smallest key.
    #[default]
    Ascending,
    /// Prefer the largest key.
    Descending,
}

/// A duplicate-resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Prefer candidates by path depth below their source root.
    PathDepth(Direction),
    /// Prefer candidates by the ordinal of their source.
    SourceOrder(Direction),
    /// Prefer candidates by modification time.
    ModDate(Direction),
    /// Drop candidates whose file name matches a common copy pattern.
    CopyPattern,
    /// Ask an external collaborator to pick the original.
    Interactive,
    /// Deterministically pick the lexicographically smallest path.
    Arbitrary,
}

/// Result of applying one resolver to a candidate set.
///
/// `retained` is never empty for any resolver in this module; `removed`
/// members are marked non-original.
#[derive(Debug)]
pub struct Split {
    /// Candidates that remain in contention (or the chosen original).
    pub retained: Vec<FileRecord>,
    /// Candidates marked non-original by this resolver.
    pub removed: Vec<FileRecord>,
}

impl Split {
    fn keep_all(candidates: Vec<FileRecord>) -> Self {
        Self {
            retained: candidates,
            removed: Vec::new(),
        }
    }
}

/// Errors that can interrupt resolution.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// The user chose to abort the whole run from an interactive prompt.
    #[error("resolution canceled by user")]
    Canceled,

    /// The interactive collaborator failed (e.g. stdin closed).
    #[error("interactive prompt failed: {0}")]
    Prompt(#[from] io::Error),
}

/// File-name patterns that mark a file as a likely copy.
static COPY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        "^Copy of",
        ".* copy [0-9]+\\.[a-zA-Z0-9]{3}$",
        "^[0-9]_.+",
        ".*\\([0-9]\\)\\.[a-zA-Z0-9]{3}$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("copy pattern is valid"))
    .collect()
});

/// Whether a file name matches one of the known copy patterns.
#[must_use]
pub fn looks_like_copy(name: &str) -> bool {
    COPY_PATTERNS.iter().any(|p| p.is_match(name))
}

impl Resolver {
    /// Human-readable name, matching the CLI vocabulary.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PathDepth(_) => "path-depth",
            Self::SourceOrder(_) => "source-order",
            Self::ModDate(_) => "mod-date",
            Self::CopyPattern => "copy-pattern",
            Self::Interactive => "interactive",
            Self::Arbitrary => "arbitrary",
        }
    }

    /// Whether this resolver takes a sort direction.
    #[must_use]
    pub fn is_sort_based(&self) -> bool {
        matches!(
            self,
            Self::PathDepth(_) | Self::SourceOrder(_) | Self::ModDate(_)
        )
    }

    /// Apply this resolver to the current candidate set.
    ///
    /// The returned [`Split`] never has an empty `retained` set. A resolver
    /// whose key makes no distinction passes the set through unchanged.
    ///
    /// # Errors
    ///
    /// Only the interactive resolver can fail: [`ResolveError::Canceled`]
    /// when the user aborts the run, [`ResolveError::Prompt`] on I/O failure.
    pub fn apply(
        &self,
        candidates: Vec<FileRecord>,
        prompt: &mut dyn Prompt,
    ) -> Result<Split, ResolveError> {
        if candidates.len() < 2 {
            return Ok(Split::keep_all(candidates));
        }

        let split = match self {
            Self::PathDepth(direction) => {
                retain_extreme(candidates, |r| r.depth(), *direction)
            }
            Self::SourceOrder(direction) => {
                retain_extreme(candidates, |r| r.source, *direction)
            }
            Self::ModDate(direction) => {
                retain_extreme(candidates, |r| r.modified, *direction)
            }
            Self::CopyPattern => remove_copies(candidates),
            Self::Interactive => return interactive(candidates, prompt),
            Self::Arbitrary => arbitrary(candidates),
        };

        Ok(split)
    }
}

/// Keep only candidates whose key equals the extreme (min for ascending,
/// max for descending) value.
fn retain_extreme<K, F>(candidates: Vec<FileRecord>, key: F, direction: Direction) -> Split
where
    K: Ord,
    F: Fn(&FileRecord) -> K,
{
    let extreme = match direction {
        Direction::Ascending => candidates.iter().map(&key).min(),
        Direction::Descending => candidates.iter().map(&key).max(),
    };
    let Some(extreme) = extreme else {
        return Split::keep_all(candidates);
    };

    let (retained, removed) = candidates
        .into_iter()
        .partition(|candidate| key(candidate) == extreme);
    Split { retained, removed }
}

/// Drop copy-looking candidates, unless every candidate looks like a copy.
fn remove_copies(candidates: Vec<FileRecord>) -> Split {
    let (originals, copies): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| !looks_like_copy(&candidate.file_name()));

    if originals.is_empty() {
        // Removing everything would leave nothing to keep; pass through.
        Split::keep_all(copies)
    } else {
        Split {
            retained: originals,
            removed: copies,
        }
    }
}

/// Pick the lexicographically smallest path as the original.
fn arbitrary(mut candidates: Vec<FileRecord>) -> Split {
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    let mut iter = candidates.into_iter();
    let retained = iter.next().into_iter().collect();
    Split {
        retained,
        removed: iter.collect(),
    }
}

/// Present the candidates to the prompt collaborator, sorted by path.
fn interactive(
    mut candidates: Vec<FileRecord>,
    prompt: &mut dyn Prompt,
) -> Result<Split, ResolveError> {
    candidates.sort_by(|a, b| a.path.cmp(&b.path));

    match prompt.choose(&candidates)? {
        Decision::Keep(index) if index < candidates.len() => {
            let original = candidates.remove(index);
            Ok(Split {
                retained: vec![original],
                removed: candidates,
            })
        }
        Decision::Keep(index) => {
            log::warn!(
                "Prompt returned out-of-range selection {} for {} candidates; skipping group",
                index,
                candidates.len()
            );
            Ok(Split::keep_all(candidates))
        }
        Decision::Skip => Ok(Split::keep_all(candidates)),
        Decision::Cancel => Err(ResolveError::Canceled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    /// Prompt stub that always answers with a fixed decision.
    struct Scripted(Decision);

    impl Prompt for Scripted {
        fn choose(&mut self, _group: &[FileRecord]) -> io::Result<Decision> {
            Ok(match self.0 {
                Decision::Keep(i) => Decision::Keep(i),
                Decision::Skip => Decision::Skip,
                Decision::Cancel => Decision::Cancel,
            })
        }
    }

    fn no_prompt() -> Scripted {
        Scripted(Decision::Skip)
    }

    fn record(path: &str, source: usize, relative: &str, mtime_secs: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(path),
            source,
            PathBuf::from(relative),
            100,
            SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs),
        )
    }

    fn paths(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.path.to_str().unwrap()).collect()
    }

    #[test]
    fn test_path_depth_ascending_keeps_shallowest() {
        let candidates = vec![
            record("/s/deep/nested/a", 0, "deep/nested/a", 0),
            record("/s/b", 0, "b", 0),
            record("/s/deep/c", 0, "deep/c", 0),
        ];
        let split = Resolver::PathDepth(Direction::Ascending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/s/b"]);
        assert_eq!(split.removed.len(), 2);
    }

    #[test]
    fn test_path_depth_descending_keeps_deepest() {
        let candidates = vec![
            record("/s/deep/nested/a", 0, "deep/nested/a", 0),
            record("/s/b", 0, "b", 0),
        ];
        let split = Resolver::PathDepth(Direction::Descending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/s/deep/nested/a"]);
    }

    #[test]
    fn test_source_order_keeps_earliest_source() {
        let candidates = vec![
            record("/b/x", 1, "x", 0),
            record("/a/x", 0, "x", 0),
            record("/c/x", 2, "x", 0),
        ];
        let split = Resolver::SourceOrder(Direction::Ascending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/a/x"]);
        assert_eq!(split.removed.len(), 2);
    }

    #[test]
    fn test_source_order_no_distinction_passes_through() {
        let candidates = vec![record("/a/x", 0, "x", 0), record("/a/y", 0, "y", 0)];
        let split = Resolver::SourceOrder(Direction::Ascending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(split.retained.len(), 2);
        assert!(split.removed.is_empty());
    }

    #[test]
    fn test_mod_date_descending_keeps_newest() {
        let candidates = vec![
            record("/a/x", 0, "x", 100),
            record("/a/y", 0, "y", 300),
            record("/a/z", 0, "z", 200),
        ];
        let split = Resolver::ModDate(Direction::Descending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/a/y"]);
    }

    #[test]
    fn test_mod_date_tie_advances_all_tied() {
        let candidates = vec![
            record("/a/x", 0, "x", 100),
            record("/a/y", 0, "y", 100),
            record("/a/z", 0, "z", 50),
        ];
        let split = Resolver::ModDate(Direction::Descending)
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/a/x", "/a/y"]);
        assert_eq!(paths(&split.removed), vec!["/a/z"]);
    }

    #[test]
    fn test_sort_resolver_is_idempotent() {
        let candidates = vec![
            record("/a/x", 0, "x", 100),
            record("/a/y", 0, "y", 100),
            record("/a/z", 0, "z", 50),
        ];
        let resolver = Resolver::ModDate(Direction::Descending);
        let first = resolver.apply(candidates, &mut no_prompt()).unwrap();
        let retained_paths: Vec<String> = first
            .retained
            .iter()
            .map(|r| r.path.display().to_string())
            .collect();
        let second = resolver.apply(first.retained, &mut no_prompt()).unwrap();
        assert!(second.removed.is_empty());
        let second_paths: Vec<String> = second
            .retained
            .iter()
            .map(|r| r.path.display().to_string())
            .collect();
        assert_eq!(retained_paths, second_paths);
    }

    #[test]
    fn test_copy_pattern_names() {
        assert!(looks_like_copy("Copy of report.doc"));
        assert!(looks_like_copy("report copy 2.doc"));
        assert!(looks_like_copy("1_report.doc"));
        assert!(looks_like_copy("report(1).doc"));
        assert!(!looks_like_copy("report.doc"));
        assert!(!looks_like_copy("my report.doc"));
    }

    #[test]
    fn test_copy_pattern_removes_copies() {
        let candidates = vec![
            record("/a/report.doc", 0, "report.doc", 0),
            record("/a/Copy of report.doc", 0, "Copy of report.doc", 0),
        ];
        let split = Resolver::CopyPattern
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/a/report.doc"]);
        assert_eq!(paths(&split.removed), vec!["/a/Copy of report.doc"]);
    }

    #[test]
    fn test_copy_pattern_never_empties_the_set() {
        let candidates = vec![
            record("/a/Copy of x.doc", 0, "Copy of x.doc", 0),
            record("/a/Copy of y.doc", 0, "Copy of y.doc", 0),
        ];
        let split = Resolver::CopyPattern
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(split.retained.len(), 2);
        assert!(split.removed.is_empty());
    }

    #[test]
    fn test_arbitrary_picks_lexicographically_smallest_path() {
        let candidates = vec![
            record("/b/zzz.txt", 0, "zzz.txt", 0),
            record("/a/zzz.txt", 1, "zzz.txt", 0),
            record("/a/aaa.txt", 1, "aaa.txt", 0),
        ];
        let split = Resolver::Arbitrary
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/a/aaa.txt"]);
        assert_eq!(split.removed.len(), 2);
    }

    #[test]
    fn test_interactive_keep_selects_by_sorted_index() {
        let candidates = vec![
            record("/b/x", 0, "x", 0),
            record("/a/x", 1, "x", 0),
        ];
        // Index 1 in path-sorted order is /b/x.
        let split = Resolver::Interactive
            .apply(candidates, &mut Scripted(Decision::Keep(1)))
            .unwrap();
        assert_eq!(paths(&split.retained), vec!["/b/x"]);
        assert_eq!(paths(&split.removed), vec!["/a/x"]);
    }

    #[test]
    fn test_interactive_skip_passes_through() {
        let candidates = vec![record("/a/x", 0, "x", 0), record("/b/x", 1, "x", 0)];
        let split = Resolver::Interactive
            .apply(candidates, &mut Scripted(Decision::Skip))
            .unwrap();
        assert_eq!(split.retained.len(), 2);
        assert!(split.removed.is_empty());
    }

    #[test]
    fn test_interactive_cancel_aborts() {
        let candidates = vec![record("/a/x", 0, "x", 0), record("/b/x", 1, "x", 0)];
        let err = Resolver::Interactive
            .apply(candidates, &mut Scripted(Decision::Cancel))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Canceled));
    }

    #[test]
    fn test_single_candidate_passes_through_unchanged() {
        let candidates = vec![record("/a/x", 0, "x", 0)];
        let split = Resolver::Arbitrary
            .apply(candidates, &mut no_prompt())
            .unwrap();
        assert_eq!(split.retained.len(), 1);
        assert!(split.removed.is_empty());
    }
}
