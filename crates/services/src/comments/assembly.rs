//! # Comment tree assembly
//!
//! Turns a flat, unordered comment batch into an ordered forest in three
//! phases, all working on index lists into one arena:
//!
//! 1. index every record by id,
//! 2. link each record into its parent's child list and sort every list,
//! 3. materialize owned [`CommentNode`]s bottom-up.
//!
//! No node is handed out before its subtree is complete, and no phase
//! recurses, so a reply chain of any depth costs the same single pass.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use domains::{
    AssemblyPolicy, CommentId, CommentRecord, CyclePolicy, DomainError, DuplicatePolicy,
    OrphanPolicy, Result,
};
use tracing::{debug, warn};

use super::node::CommentNode;
use super::ordering::SiblingOrder;

/// What the builder had to leave out or repair while assembling a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Comments whose parent was not part of the batch, in ascending id order.
    pub orphans: Vec<CommentId>,
    /// Comments left out of the forest: dropped orphans, their replies, and
    /// everything hanging off a parent cycle. Ascending id order.
    pub dropped: Vec<CommentId>,
    /// The subset of `dropped` whose parent chain never reaches a root.
    pub detached: Vec<CommentId>,
    /// Ids that appeared more than once; only the first record was kept.
    pub duplicates: Vec<CommentId>,
}

impl AssemblyReport {
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.dropped.is_empty() && self.duplicates.is_empty()
    }
}

/// The ordered root comments of one batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommentForest {
    roots: Vec<CommentNode>,
    report: AssemblyReport,
}

impl CommentForest {
    /// Root comments, newest first.
    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    pub fn into_roots(self) -> Vec<CommentNode> {
        self.roots
    }

    /// Number of comments placed anywhere in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(CommentNode::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk over every placed comment, yielding `(level, node)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CommentNode)> {
        self.roots.iter().flat_map(CommentNode::iter)
    }
}

/// Builds comment forests under a fixed [`AssemblyPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentTreeBuilder {
    policy: AssemblyPolicy,
}

impl CommentTreeBuilder {
    pub fn new(policy: AssemblyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AssemblyPolicy {
        self.policy
    }

    pub fn assemble<I>(&self, records: I) -> Result<CommentForest>
    where
        I: IntoIterator<Item = CommentRecord>,
    {
        let mut report = AssemblyReport::default();

        // 1. Arena, keyed by id.
        let mut arena: Vec<CommentRecord> = Vec::new();
        let mut index: HashMap<CommentId, usize> = HashMap::new();
        for record in records {
            match index.entry(record.id) {
                Entry::Vacant(slot) => {
                    slot.insert(arena.len());
                    arena.push(record);
                }
                Entry::Occupied(_) => match self.policy.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(DomainError::DuplicateCommentId(record.id));
                    }
                    DuplicatePolicy::KeepFirst => {
                        warn!(comment_id = %record.id, "discarding duplicate comment record");
                        report.duplicates.push(record.id);
                    }
                },
            }
        }

        // 2. Link children to parents, then order every sibling list.
        let mut parents: Vec<Option<usize>> = vec![None; arena.len()];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); arena.len()];
        let mut roots: Vec<usize> = Vec::new();
        let mut dropped_orphans: Vec<usize> = Vec::new();
        for (slot, record) in arena.iter().enumerate() {
            let Some(parent_id) = record.parent_id else {
                roots.push(slot);
                continue;
            };
            if let Some(&parent) = index.get(&parent_id) {
                parents[slot] = Some(parent);
                children[parent].push(slot);
                continue;
            }
            match self.policy.orphans {
                OrphanPolicy::Reject => {
                    return Err(DomainError::DanglingParentReference {
                        id: record.id,
                        parent_id,
                    });
                }
                OrphanPolicy::Drop => {
                    warn!(comment_id = %record.id, %parent_id, "dropping comment with missing parent");
                    dropped_orphans.push(slot);
                }
                OrphanPolicy::Promote => {
                    warn!(comment_id = %record.id, %parent_id, "promoting comment with missing parent to root");
                    roots.push(slot);
                }
            }
            report.orphans.push(record.id);
        }
        roots.sort_by(|&a, &b| SiblingOrder::NewestFirst.compare(&arena[a], &arena[b]));
        for siblings in children.iter_mut() {
            siblings.sort_by(|&a, &b| SiblingOrder::OldestFirst.compare(&arena[a], &arena[b]));
        }

        // Whatever the roots cannot reach is either under a dropped orphan or
        // under a parent cycle.
        let placed = mark_reachable(&roots, &children, arena.len());
        let orphaned = mark_reachable(&dropped_orphans, &children, arena.len());
        let detached: Vec<usize> = (0..arena.len())
            .filter(|&slot| !placed[slot] && !orphaned[slot])
            .collect();

        if !detached.is_empty() {
            let mut members: Vec<CommentId> = cycle_members(&detached, &parents)
                .into_iter()
                .map(|slot| arena[slot].id)
                .collect();
            members.sort();
            if self.policy.cycles == CyclePolicy::Reject {
                return Err(DomainError::CyclicParentChain(members));
            }
            warn!(
                cycle = ?members,
                detached = detached.len(),
                "dropping comments caught in a parent cycle"
            );
        }

        report.detached = detached.iter().map(|&slot| arena[slot].id).collect();
        report.dropped = (0..arena.len())
            .filter(|&slot| !placed[slot])
            .map(|slot| arena[slot].id)
            .collect();
        report.orphans.sort();
        report.dropped.sort();
        report.detached.sort();

        // 3. Materialize bottom-up: a node is built only after all its children.
        let record_count = arena.len();
        let mut records: Vec<Option<CommentRecord>> = arena.into_iter().map(Some).collect();
        let mut built: Vec<Option<CommentNode>> = (0..record_count).map(|_| None).collect();
        let mut forest = Vec::with_capacity(roots.len());
        for &root in &roots {
            let mut stack = vec![(root, false)];
            while let Some((slot, expanded)) = stack.pop() {
                if !expanded {
                    stack.push((slot, true));
                    stack.extend(children[slot].iter().rev().map(|&child| (child, false)));
                    continue;
                }
                let replies = children[slot]
                    .iter()
                    .filter_map(|&child| built[child].take())
                    .collect();
                let record = records[slot].take().ok_or_else(|| {
                    DomainError::Internal(format!("comment slot {slot} materialized twice"))
                })?;
                built[slot] = Some(CommentNode::new(record, replies));
            }
            if let Some(node) = built[root].take() {
                forest.push(node);
            }
        }

        debug!(
            records = record_count,
            roots = forest.len(),
            dropped = report.dropped.len(),
            "assembled comment forest"
        );

        Ok(CommentForest {
            roots: forest,
            report,
        })
    }
}

/// Assembles `records` under the default policy.
pub fn assemble<I>(records: I) -> Result<CommentForest>
where
    I: IntoIterator<Item = CommentRecord>,
{
    CommentTreeBuilder::default().assemble(records)
}

fn mark_reachable(starts: &[usize], children: &[Vec<usize>], len: usize) -> Vec<bool> {
    let mut seen = vec![false; len];
    let mut stack: Vec<usize> = starts.to_vec();
    while let Some(slot) = stack.pop() {
        if std::mem::replace(&mut seen[slot], true) {
            continue;
        }
        stack.extend(children[slot].iter().copied());
    }
    seen
}

/// Slots that sit on a parent cycle, as opposed to hanging below one.
fn cycle_members(detached: &[usize], parents: &[Option<usize>]) -> Vec<usize> {
    const UNVISITED: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNVISITED; parents.len()];
    let mut members = Vec::new();
    for &start in detached {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(slot) = current {
            match state[slot] {
                UNVISITED => {
                    state[slot] = ON_PATH;
                    path.push(slot);
                    current = parents[slot];
                }
                ON_PATH => {
                    if let Some(pos) = path.iter().position(|&s| s == slot) {
                        members.extend_from_slice(&path[pos..]);
                    }
                    break;
                }
                _ => break,
            }
        }
        for slot in path {
            state[slot] = DONE;
        }
    }
    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domains::{ArticleId, UserAccount};
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn comment(id: i64, parent: Option<i64>, created_at: DateTime<Utc>) -> CommentRecord {
        CommentRecord {
            id: CommentId(id),
            article_id: ArticleId(1),
            parent_id: parent.map(CommentId),
            content: format!("test comment {id}"),
            created_at,
            author: UserAccount {
                user_id: "uno".into(),
                email: "uno@mail.com".into(),
                nickname: Some("Uno".into()),
            },
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.id().0).collect()
    }

    fn find(forest: &CommentForest, id: i64) -> &CommentNode {
        forest
            .iter()
            .map(|(_, node)| node)
            .find(|node| node.id().0 == id)
            .unwrap()
    }

    #[test]
    fn empty_batch_yields_empty_forest() {
        let forest = assemble(Vec::new()).unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
        assert!(forest.report().is_clean());
    }

    #[test]
    fn roots_without_replies_are_newest_first() {
        let now = t0();
        let days = Duration::days;
        let forest = assemble(vec![
            comment(1, None, now),
            comment(2, None, now + days(1)),
            comment(3, None, now + days(3)),
            comment(4, None, now),
            comment(5, None, now + days(5)),
            comment(6, None, now + days(4)),
            comment(7, None, now + days(2)),
            comment(8, None, now + days(7)),
        ])
        .unwrap();

        assert_eq!(ids(forest.roots()), vec![8, 5, 6, 3, 7, 2, 1, 4]);
    }

    #[test]
    fn roots_and_replies_use_their_own_orders() {
        let now = t0();
        let days = Duration::days;
        let forest = assemble(vec![
            comment(1, None, now),
            comment(2, Some(1), now + days(1)),
            comment(3, Some(1), now + days(3)),
            comment(4, Some(1), now),
            comment(5, None, now + days(5)),
            comment(6, None, now + days(4)),
            comment(7, Some(6), now + days(2)),
            comment(8, Some(6), now + days(7)),
        ])
        .unwrap();

        assert_eq!(ids(forest.roots()), vec![5, 6, 1]);
        let replies: Vec<i64> = forest
            .roots()
            .iter()
            .flat_map(|root| ids(root.children()))
            .collect();
        assert_eq!(replies, vec![7, 8, 4, 2, 3]);
    }

    #[test]
    fn reply_order_ignores_parent_timestamp() {
        let now = t0();
        let secs = Duration::seconds;
        let forest = assemble(vec![
            comment(3, Some(1), now + secs(3)),
            comment(1, None, now),
            comment(5, None, now + secs(5)),
            comment(4, Some(1), now),
            comment(2, Some(1), now + secs(1)),
        ])
        .unwrap();

        assert_eq!(ids(forest.roots()), vec![5, 1]);
        assert_eq!(ids(find(&forest, 1).children()), vec![4, 2, 3]);
        assert!(find(&forest, 5).children().is_empty());
    }

    fn assert_chain(len: i64) {
        let now = t0();
        // shuffled so children often arrive before their parents
        let mut records: Vec<_> = (1..=len)
            .map(|i| comment(i, (i > 1).then(|| i - 1), now + Duration::days(i - 1)))
            .collect();
        records.reverse();
        records.swap(0, (len / 2) as usize);

        let forest = assemble(records).unwrap();
        assert_eq!(forest.roots().len(), 1);

        let mut node = &forest.roots()[0];
        for i in 1..=len {
            assert_eq!(node.id(), CommentId(i));
            assert_eq!(node.record().parent_id, (i > 1).then(|| CommentId(i - 1)));
            assert_eq!(node.record().created_at, now + Duration::days(i - 1));
            if i < len {
                assert_eq!(node.children().len(), 1);
                node = &node.children()[0];
            }
        }
        assert!(node.children().is_empty());
        assert_eq!(forest.roots()[0].depth(), len as usize);
    }

    #[test]
    fn nesting_depth_is_unbounded() {
        assert_chain(8);
        assert_chain(50);
        assert_chain(1_000);
    }

    #[test]
    fn very_deep_forest_is_dropped_without_recursion() {
        let now = t0();
        let len = 120_000;
        let records: Vec<_> = (1..=len)
            .map(|i| comment(i, (i > 1).then(|| i - 1), now + Duration::seconds(i)))
            .collect();

        let forest = assemble(records).unwrap();
        assert_eq!(forest.len(), len as usize);
        assert_eq!(forest.roots()[0].depth(), len as usize);
        drop(forest);
    }

    #[test]
    fn orphans_are_dropped_with_their_replies() {
        let now = t0();
        let forest = assemble(vec![
            comment(1, None, now),
            comment(2, Some(99), now),
            comment(3, Some(2), now),
            comment(4, Some(1), now),
        ])
        .unwrap();

        assert_eq!(ids(forest.roots()), vec![1]);
        assert_eq!(ids(forest.roots()[0].children()), vec![4]);
        assert_eq!(forest.report().orphans, vec![CommentId(2)]);
        assert_eq!(forest.report().dropped, vec![CommentId(2), CommentId(3)]);
        assert!(forest.report().detached.is_empty());
    }

    #[test]
    fn orphans_can_be_promoted_to_roots() {
        let now = t0();
        let builder = CommentTreeBuilder::new(AssemblyPolicy {
            orphans: OrphanPolicy::Promote,
            ..AssemblyPolicy::default()
        });
        let forest = builder
            .assemble(vec![
                comment(1, None, now),
                comment(2, Some(99), now + Duration::minutes(1)),
                comment(3, Some(2), now),
            ])
            .unwrap();

        assert_eq!(ids(forest.roots()), vec![2, 1]);
        assert_eq!(ids(forest.roots()[0].children()), vec![3]);
        assert_eq!(forest.report().orphans, vec![CommentId(2)]);
        assert!(forest.report().dropped.is_empty());
    }

    #[test]
    fn strict_policy_rejects_dangling_parent() {
        let err = CommentTreeBuilder::new(AssemblyPolicy::strict())
            .assemble(vec![comment(1, None, t0()), comment(2, Some(7), t0())])
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::DanglingParentReference {
                id: CommentId(2),
                parent_id: CommentId(7),
            }
        );
        assert!(err.is_malformed_batch());
    }

    #[test]
    fn duplicate_ids_are_rejected_by_default() {
        let err = assemble(vec![comment(1, None, t0()), comment(1, None, t0())]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateCommentId(CommentId(1)));
    }

    #[test]
    fn keep_first_discards_later_duplicates() {
        let builder = CommentTreeBuilder::new(AssemblyPolicy {
            duplicates: DuplicatePolicy::KeepFirst,
            ..AssemblyPolicy::default()
        });
        let mut second = comment(1, None, t0());
        second.content = "second".into();
        let forest = builder
            .assemble(vec![comment(1, None, t0()), second])
            .unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest.roots()[0].record().content, "test comment 1");
        assert_eq!(forest.report().duplicates, vec![CommentId(1)]);
    }

    #[test]
    fn two_node_cycle_is_detached_without_looping() {
        let now = t0();
        let forest = assemble(vec![
            comment(1, None, now),
            comment(2, Some(3), now),
            comment(3, Some(2), now),
            comment(4, Some(3), now),
        ])
        .unwrap();

        assert_eq!(ids(forest.roots()), vec![1]);
        assert_eq!(forest.len(), 1);
        assert_eq!(
            forest.report().detached,
            vec![CommentId(2), CommentId(3), CommentId(4)]
        );
        assert!(forest.report().orphans.is_empty());
    }

    #[test]
    fn cycle_rejection_names_only_cycle_members() {
        let builder = CommentTreeBuilder::new(AssemblyPolicy {
            cycles: CyclePolicy::Reject,
            ..AssemblyPolicy::default()
        });
        let err = builder
            .assemble(vec![
                comment(2, Some(3), t0()),
                comment(3, Some(2), t0()),
                comment(4, Some(3), t0()),
                comment(5, Some(5), t0()),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::CyclicParentChain(vec![CommentId(2), CommentId(3), CommentId(5)])
        );
    }

    fn arb_batch() -> impl Strategy<Value = Vec<CommentRecord>> {
        (0usize..40).prop_flat_map(|len| {
            proptest::collection::vec((proptest::option::of(1i64..50), 0i64..6), len).prop_map(
                |rows| {
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, (parent, minutes))| {
                            comment(i as i64 + 1, parent, t0() + Duration::minutes(minutes))
                        })
                        .collect()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn every_comment_is_placed_or_reported_exactly_once(batch in arb_batch()) {
            let total = batch.len();
            let forest = assemble(batch.clone()).unwrap();

            let mut placed: Vec<CommentId> = forest.iter().map(|(_, n)| n.id()).collect();
            placed.sort();
            let before = placed.len();
            placed.dedup();
            prop_assert_eq!(before, placed.len());
            prop_assert_eq!(placed.len() + forest.report().dropped.len(), total);
            for id in &forest.report().dropped {
                prop_assert!(placed.binary_search(id).is_err());
            }
        }

        #[test]
        fn sibling_lists_follow_their_rules(batch in arb_batch()) {
            let forest = assemble(batch).unwrap();

            for pair in forest.roots().windows(2) {
                let (a, b) = (pair[0].record(), pair[1].record());
                prop_assert!(
                    a.created_at > b.created_at || (a.created_at == b.created_at && a.id < b.id)
                );
            }
            for (_, node) in forest.iter() {
                for pair in node.children().windows(2) {
                    let (a, b) = (pair[0].record(), pair[1].record());
                    prop_assert!(
                        a.created_at < b.created_at || (a.created_at == b.created_at && a.id < b.id)
                    );
                }
                for child in node.children() {
                    prop_assert_eq!(child.record().parent_id, Some(node.id()));
                }
            }
        }

        #[test]
        fn orphans_never_appear_in_the_forest(batch in arb_batch()) {
            let known: std::collections::HashSet<_> = batch.iter().map(|r| r.id).collect();
            let forest = assemble(batch).unwrap();
            for (level, node) in forest.iter() {
                if let Some(parent) = node.record().parent_id {
                    prop_assert!(known.contains(&parent));
                    prop_assert!(level > 0);
                }
            }
        }
    }
}
