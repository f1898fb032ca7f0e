//! Chain execution: run configured resolvers over a group until settled.
//!
//! Each group moves through a small state machine: it starts pending, each
//! configured resolver is applied at most once to the evolving candidate
//! set, and the group ends either resolved (exactly one original) or
//! unresolved (the chain exhausted with two or more candidates left).
//! Unresolved candidates are retained as if each were an original; only
//! candidates removed along the way are marked non-original.

use crate::duplicates::DuplicateGroup;
use crate::scanner::FileRecord;

use super::{Prompt, ResolveError, Resolver, Split};

/// Terminal state of one group after the chain has run.
#[derive(Debug)]
pub enum Outcome {
    /// A single original was isolated.
    Resolved(FileRecord),
    /// The chain exhausted with two or more candidates remaining; all of
    /// them are retained.
    Unresolved(Vec<FileRecord>),
}

/// Result of resolving one duplicate group.
#[derive(Debug)]
pub struct GroupResolution {
    /// Terminal state of the candidate set.
    pub outcome: Outcome,
    /// Files marked non-original along the way, in removal order.
    pub non_originals: Vec<FileRecord>,
}

impl GroupResolution {
    /// Whether the chain isolated a single original.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, Outcome::Resolved(_))
    }
}

/// Mutable per-group state carried through the chain.
#[derive(Debug)]
struct ResolutionState {
    candidates: Vec<FileRecord>,
    non_originals: Vec<FileRecord>,
}

impl ResolutionState {
    fn new(candidates: Vec<FileRecord>) -> Self {
        Self {
            candidates,
            non_originals: Vec::new(),
        }
    }

    /// One candidate left: the chain can stop.
    fn is_settled(&self) -> bool {
        self.candidates.len() <= 1
    }

    fn absorb(&mut self, split: Split) {
        if split.retained.is_empty() {
            // A resolver must never empty the candidate set; treat a
            // misbehaving one as making no distinction.
            self.candidates = split.removed;
        } else {
            for removed in &split.removed {
                log::trace!("Marked non-original: {}", removed.path.display());
            }
            self.non_originals.extend(split.removed);
            self.candidates = split.retained;
        }
    }

    fn finish(mut self) -> GroupResolution {
        let outcome = if self.candidates.len() == 1 {
            match self.candidates.pop() {
                Some(original) => Outcome::Resolved(original),
                None => Outcome::Unresolved(Vec::new()),
            }
        } else {
            Outcome::Unresolved(self.candidates)
        };
        GroupResolution {
            outcome,
            non_originals: self.non_originals,
        }
    }
}

/// Run the resolver chain over one duplicate group.
///
/// Resolvers run strictly in configured order; the chain stops as soon as a
/// single candidate remains. Each resolver runs at most once per group.
///
/// # Errors
///
/// Propagates [`ResolveError`] from the interactive resolver; no sink action
/// has been taken for this group when that happens.
pub fn resolve_group(
    group: DuplicateGroup,
    resolvers: &[Resolver],
    prompt: &mut dyn Prompt,
) -> Result<GroupResolution, ResolveError> {
    log::debug!(
        "Resolving group of {} files ({}, {} bytes each)",
        group.len(),
        &group.digest_hex()[..16],
        group.size
    );

    let mut state = ResolutionState::new(group.files);

    for resolver in resolvers {
        if state.is_settled() {
            break;
        }

        let before = state.candidates.len();
        let split = resolver.apply(std::mem::take(&mut state.candidates), prompt)?;
        state.absorb(split);

        log::debug!(
            "Resolver {}: {} -> {} candidates",
            resolver.name(),
            before,
            state.candidates.len()
        );
    }

    let resolution = state.finish();
    match &resolution.outcome {
        Outcome::Resolved(original) => {
            log::debug!("Original: {}", original.path.display());
        }
        Outcome::Unresolved(remaining) => {
            log::debug!("Unresolved with {} candidates remaining", remaining.len());
        }
    }
    Ok(resolution)
}
