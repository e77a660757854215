use std::fmt;

use domains::{CommentId, CommentRecord};

/// A comment together with its already-ordered replies.
///
/// Nodes are only built by the tree builder and are read-only afterwards;
/// the parent link lives in `record.parent_id` as plain data.
///
/// Dropping, comparing and formatting walk the subtree with a heap stack,
/// never the call stack, so reply chains of any depth are safe to handle.
pub struct CommentNode {
    record: CommentRecord,
    children: Vec<CommentNode>,
}

impl CommentNode {
    pub(crate) fn new(record: CommentRecord, children: Vec<CommentNode>) -> Self {
        Self { record, children }
    }

    pub fn id(&self) -> CommentId {
        self.record.id
    }

    pub fn record(&self) -> &CommentRecord {
        &self.record
    }

    /// Direct replies, oldest first.
    pub fn children(&self) -> &[CommentNode] {
        &self.children
    }

    /// Number of comments in this subtree, including this one.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels in this subtree; a comment without replies has depth 1.
    pub fn depth(&self) -> usize {
        self.iter().map(|(level, _)| level + 1).max().unwrap_or(1)
    }

    /// Pre-order walk of the subtree yielding `(level, node)`, level 0 being `self`.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }
}

impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl PartialEq for CommentNode {
    /// Two subtrees are equal when their pre-order walks match level by level.
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some((la, a)), Some((lb, b))) => {
                    if la != lb || a.record != b.record || a.children.len() != b.children.len() {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Eq for CommentNode {}

impl fmt::Debug for CommentNode {
    /// Flat pre-order listing of `(level, record)` pairs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(level, node)| (level, &node.record)))
            .finish()
    }
}

/// Depth-first iterator over a comment subtree. Uses an explicit stack so
/// arbitrarily deep reply chains do not grow the call stack.
pub struct Iter<'a> {
    stack: Vec<(usize, &'a CommentNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a CommentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.stack.pop()?;
        // reversed so the first child is popped next
        self.stack
            .extend(node.children.iter().rev().map(|child| (level + 1, child)));
        Some((level, node))
    }
}
