//! Duplicate detection: two-phase grouping of scanned files.
//!
//! - Phase 1: bucket records by exact byte size ([`finder::group_by_size`])
//! - Phase 2: confirm buckets with whole-file SHA-512 digests
//!   ([`finder::confirm_groups`])

pub mod finder;
pub mod groups;

pub use finder::{confirm_groups, group_by_size};
pub use groups::{ConfirmStats, DuplicateGroup, GroupingStats};
