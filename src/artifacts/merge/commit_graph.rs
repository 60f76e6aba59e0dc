//! Commit graph walker
//!
//! Breadth-first walks over the parent links of the commit DAG, following
//! every parent of merge commits. Parents are fetched through a loader
//! closure, so the walker runs equally well over the object database and over
//! in-memory graphs.
//!
//! ## Merge base
//!
//! The merge base of two commits is the common ancestor with the smallest sum
//! of BFS distances from both commits. Ties are broken by picking the
//! lexicographically smallest commit ID, so the choice never depends on map
//! iteration order.

use crate::artifacts::objects::object_id::ObjectId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

/// BFS walker over commit parents
///
/// # Type Parameters
///
/// * `ParentsLoaderFn` - returns the parents of a commit, or `None` when the
///   commit cannot be read; such commits are treated as roots.
pub struct CommitGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Option<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
    /// Parents already loaded, keyed by commit
    cache: RefCell<HashMap<ObjectId, Vec<ObjectId>>>,
}

impl<ParentsLoaderFn> CommitGraph<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> Option<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self {
            parents_loader,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn parents(&self, commit: &ObjectId) -> Vec<ObjectId> {
        if let Some(parents) = self.cache.borrow().get(commit) {
            return parents.clone();
        }

        let parents = (self.parents_loader)(commit).unwrap_or_else(|| {
            tracing::warn!(oid = %commit, "unreadable commit treated as a root");
            Vec::new()
        });
        self.cache
            .borrow_mut()
            .insert(commit.clone(), parents.clone());

        parents
    }

    /// `start` and every commit reachable from it, in BFS discovery order
    pub fn ancestors(&self, start: &ObjectId) -> Vec<ObjectId> {
        self.walk(start).into_iter().map(|(oid, _)| oid).collect()
    }

    /// Shortest edge distance from `start` to each of its ancestors (`start` itself is 0)
    pub fn ancestors_with_distance(&self, start: &ObjectId) -> HashMap<ObjectId, usize> {
        self.walk(start).into_iter().collect()
    }

    fn walk(&self, start: &ObjectId) -> Vec<(ObjectId, usize)> {
        let mut discovered = Vec::new();
        let mut visited = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([(start.clone(), 0)]);

        while let Some((commit, distance)) = queue.pop_front() {
            for parent in self.parents(&commit) {
                if visited.insert(parent.clone()) {
                    queue.push_back((parent, distance + 1));
                }
            }
            discovered.push((commit, distance));
        }

        discovered
    }

    /// Lowest common ancestor of two commits, `None` for unrelated histories
    pub fn common_ancestor(&self, first: &ObjectId, second: &ObjectId) -> Option<ObjectId> {
        let first_distances = self.ancestors_with_distance(first);
        let second_distances = self.ancestors_with_distance(second);

        let candidates = first_distances
            .iter()
            .filter_map(|(oid, first_distance)| {
                second_distances
                    .get(oid)
                    .map(|second_distance| (first_distance + second_distance, oid))
            })
            .collect::<Vec<_>>();

        let best = candidates.iter().min().map(|(_, oid)| (*oid).clone());
        tracing::debug!(
            first = %first,
            second = %second,
            candidates = candidates.len(),
            merge_base = ?best.as_ref().map(ObjectId::to_short_oid),
            "merge base search"
        );

        best
    }

    /// Whether moving `current` to `incoming` keeps all of `current`'s history
    pub fn is_fast_forward(&self, current: &ObjectId, incoming: &ObjectId) -> bool {
        self.ancestors(incoming).contains(current)
    }
}
