//! # Assembly Policy
//!
//! How the comment tree builder reacts to inconsistent batches.
//! The defaults reproduce the board's historical behavior: orphans and
//! cycle members vanish from the tree, duplicate ids fail the batch.

use serde::{Deserialize, Serialize};

/// What to do with a comment whose parent is not in the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Leave it (and its replies) out of the tree.
    #[default]
    Drop,
    /// Show it as a root comment.
    Promote,
    /// Fail the whole batch with `DanglingParentReference`.
    Reject,
}

/// What to do when two records share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    /// Keep the first record seen for each id, discard the rest.
    KeepFirst,
}

/// What to do with comments whose parent chain never reaches a root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    #[default]
    Drop,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyPolicy {
    #[serde(default)]
    pub orphans: OrphanPolicy,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default)]
    pub cycles: CyclePolicy,
}

impl AssemblyPolicy {
    /// Every inconsistency fails the batch.
    pub fn strict() -> Self {
        Self {
            orphans: OrphanPolicy::Reject,
            duplicates: DuplicatePolicy::Reject,
            cycles: CyclePolicy::Reject,
        }
    }
}
