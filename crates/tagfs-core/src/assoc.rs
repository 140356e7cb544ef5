//! File-tag association diffing.
//!
//! Moving a file's tag set to a desired set is expressed as the minimal
//! add/remove diff between the two sets; the store applies the diff as one
//! atomic batch. An equal desired set produces an empty diff, making the
//! operation idempotent.

use std::collections::HashSet;

/// The minimal set of writes moving an existing tag set to a desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: Vec<i64>,
    pub to_remove: Vec<i64>,
}

impl TagDiff {
    /// True when applying the diff would write nothing.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute `desired − existing` (additions) and `existing − desired`
/// (removals). Results are sorted for deterministic application order.
pub fn diff_tag_sets(existing: &HashSet<i64>, desired: &HashSet<i64>) -> TagDiff {
    let mut to_add: Vec<i64> = desired.difference(existing).copied().collect();
    let mut to_remove: Vec<i64> = existing.difference(desired).copied().collect();
    to_add.sort_unstable();
    to_remove.sort_unstable();
    TagDiff { to_add, to_remove }
}
