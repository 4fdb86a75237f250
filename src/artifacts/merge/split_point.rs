//! Split point finder for merge operations
//!
//! The split point of two branch tips is the common ancestor a three-way merge
//! uses as its base. It is found from the ancestor-distance maps of both tips.
//!
//! ## Algorithm
//!
//! 1. Walk the parents of each tip breadth-first with an explicit queue and a
//!    visited map. The first visit of a commit is along a shortest path, so the
//!    walk records the distance of every ancestor (the tip itself at 0) while
//!    loading each commit once.
//! 2. Among the commits present in both maps, pick the one closest to the
//!    current tip (`A`).
//!
//! ## Tie-break
//!
//! Several common ancestors can be equally close to `A` (e.g. after criss-cross
//! merges). Candidates are ordered by:
//!
//! 1. distance from `A`
//! 2. combined distance from `A` and `B`
//! 3. most recent timestamp
//! 4. smallest id
//!
//! The last key makes the choice total, so the result never depends on hash
//! map iteration order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = SplitPointFinder::new(|oid| repository.load_slim_commit(oid));
//!
//! let split_point = finder.split_point(&head_oid, &other_oid)?;
//! ```

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ancestor {
    distance: usize,
    timestamp: DateTime<FixedOffset>,
}

/// Finds split points in a commit graph
///
/// The commit loader returns the parents and timestamp of any commit id, which
/// keeps the algorithm independent of where commits are stored.
#[derive(Debug, Clone)]
pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Every ancestor of `commit_id` (itself included, at distance 0) with
    /// its shortest distance in parent links
    pub fn ancestors_with_distance(
        &self,
        commit_id: &ObjectId,
    ) -> anyhow::Result<HashMap<ObjectId, usize>> {
        Ok(self
            .walk(commit_id)?
            .into_iter()
            .map(|(oid, ancestor)| (oid, ancestor.distance))
            .collect())
    }

    /// The split point of `current` and `other`, `None` only for disjoint histories
    pub fn split_point(
        &self,
        current: &ObjectId,
        other: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        if current == other {
            return Ok(Some(current.clone()));
        }

        let current_ancestors = self.walk(current)?;
        let other_ancestors = self.walk(other)?;

        let split_point = current_ancestors
            .iter()
            .filter_map(|(oid, ancestor)| {
                other_ancestors
                    .get(oid)
                    .map(|other_ancestor| (oid, ancestor, other_ancestor.distance))
            })
            .min_by_key(|(oid, ancestor, other_distance)| {
                (
                    ancestor.distance,
                    ancestor.distance + other_distance,
                    Reverse(ancestor.timestamp),
                    (*oid).clone(),
                )
            })
            .map(|(oid, _, _)| oid.clone());

        debug!(
            %current,
            %other,
            split_point = ?split_point.as_ref().map(ObjectId::to_short_oid),
            "computed split point"
        );

        Ok(split_point)
    }

    fn walk(&self, start: &ObjectId) -> anyhow::Result<HashMap<ObjectId, Ancestor>> {
        let mut ancestors = HashMap::new();
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);

        while let Some((oid, distance)) = queue.pop_front() {
            if ancestors.contains_key(&oid) {
                continue;
            }

            let commit = (self.commit_loader)(&oid)?;
            for parent in commit.parents {
                if !ancestors.contains_key(&parent) {
                    queue.push_back((parent, distance + 1));
                }
            }

            ancestors.insert(
                oid,
                Ancestor {
                    distance,
                    timestamp: commit.timestamp,
                },
            );
        }

        debug!(start = %start.to_short_oid(), visited = ancestors.len(), "walked ancestors");
        Ok(ancestors)
    }
}
