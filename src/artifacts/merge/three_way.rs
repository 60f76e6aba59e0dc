//! Three-way tree classification
//!
//! Every path present in either side of a merge is compared against the merge
//! base and lands in exactly one bucket: take the incoming version, delete the
//! file, keep ours as-is, or report a conflict. Only blob IDs are compared, so
//! identical content on both sides never conflicts.

use crate::artifacts::database::FlatTree;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

/// Why a path could not be merged automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both sides changed the file differently
    ModifyModify,
    /// Both sides added the file with different content
    AddAdd,
    /// We deleted the file, they modified it
    DeleteModify,
    /// We modified the file, they deleted it
    ModifyDelete,
}

impl ConflictKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictKind::ModifyModify => "both modified",
            ConflictKind::AddAdd => "both added",
            ConflictKind::DeleteModify => "deleted by us",
            ConflictKind::ModifyDelete => "deleted by them",
        }
    }
}

/// A conflicting path with the blob each side holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub kind: ConflictKind,
    pub ours: Option<ObjectId>,
    pub theirs: Option<ObjectId>,
}

/// Outcome of classifying every path of a three-way merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    writes: BTreeMap<String, DatabaseEntry>,
    deletions: BTreeSet<String>,
    conflicts: BTreeMap<String, MergeConflict>,
}

impl MergePlan {
    /// Classify the union of the paths in `ours` and `theirs` against `base`
    pub fn classify(base: &FlatTree, ours: &FlatTree, theirs: &FlatTree) -> Self {
        let mut plan = MergePlan::default();
        let paths = ours.keys().chain(theirs.keys()).collect::<BTreeSet<_>>();

        for path in paths {
            let current = ours.get(path).map(|entry| &entry.oid);
            let incoming = theirs.get(path);
            let original = base.get(path).map(|entry| &entry.oid);

            let conflict = |kind| MergeConflict {
                kind,
                ours: current.cloned(),
                theirs: incoming.map(|entry| entry.oid.clone()),
            };

            match (current, incoming.map(|entry| &entry.oid), original) {
                (Some(c), Some(i), Some(b)) if c != i && c != b && i != b => {
                    plan.conflicts
                        .insert(path.clone(), conflict(ConflictKind::ModifyModify));
                }
                (Some(c), Some(i), None) if c != i => {
                    plan.conflicts.insert(path.clone(), conflict(ConflictKind::AddAdd));
                }
                (None, Some(i), Some(b)) if i != b => {
                    plan.conflicts
                        .insert(path.clone(), conflict(ConflictKind::DeleteModify));
                }
                (Some(c), None, Some(b)) if c != b => {
                    plan.conflicts
                        .insert(path.clone(), conflict(ConflictKind::ModifyDelete));
                }
                (None, Some(_), None) => {
                    if let Some(entry) = incoming {
                        plan.writes.insert(path.clone(), entry.clone());
                    }
                }
                (Some(c), Some(i), Some(b)) if i != b && c == b => {
                    if let Some(entry) = incoming {
                        plan.writes.insert(path.clone(), entry.clone());
                    }
                }
                (Some(c), None, Some(b)) if c == b => {
                    plan.deletions.insert(path.clone());
                }
                _ => {}
            }
        }

        tracing::debug!(
            writes = plan.writes.len(),
            deletions = plan.deletions.len(),
            conflicts = plan.conflicts.len(),
            "classified merge paths"
        );

        plan
    }

    /// Incoming blobs to take over, keyed by path
    pub fn writes(&self) -> &BTreeMap<String, DatabaseEntry> {
        &self.writes
    }

    /// Paths deleted on their side and untouched on ours
    pub fn deletions(&self) -> &BTreeSet<String> {
        &self.deletions
    }

    pub fn conflicts(&self) -> &BTreeMap<String, MergeConflict> {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
