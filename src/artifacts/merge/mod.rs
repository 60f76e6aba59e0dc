//! Merge machinery
//!
//! - `commit_graph`: ancestry walks and merge base selection
//! - `three_way`: per-path classification of a merge against its base
//! - `conflict`: conflict markers and merge commit messages

use crate::artifacts::objects::object_id::ObjectId;

pub mod commit_graph;
pub mod conflict;
pub mod three_way;

/// What a merge did to the current branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merging a branch into itself
    AlreadyOnBranch,
    /// Both branches point at the same commit
    AlreadyUpToDate,
    /// The current branch was moved forward without a merge commit
    FastForward { from: ObjectId, to: ObjectId },
    /// A merge commit with both tips as parents was created
    Merged { commit: ObjectId },
    /// Conflict markers were written and the merge awaits a commit
    Conflicted { conflicts: Vec<String> },
}
