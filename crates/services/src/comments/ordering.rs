//! Sibling ordering rules.
//!
//! Both comparators are total orders over a batch with unique ids: two
//! records only compare equal when they share an id.

use std::cmp::Ordering;

use domains::CommentRecord;

/// Top-level comments: newest first, ties broken by ascending id.
pub fn root_order(a: &CommentRecord, b: &CommentRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Replies: oldest first, ties broken by ascending id.
pub fn child_order(a: &CommentRecord, b: &CommentRecord) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Which of the two rules governs a sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingOrder {
    /// Feed order for root comments.
    NewestFirst,
    /// Conversational order for replies.
    OldestFirst,
}

impl SiblingOrder {
    pub fn compare(self, a: &CommentRecord, b: &CommentRecord) -> Ordering {
        match self {
            Self::NewestFirst => root_order(a, b),
            Self::OldestFirst => child_order(a, b),
        }
    }
}
