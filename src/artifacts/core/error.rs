//! Repository error taxonomy
//!
//! Recognized failure states are raised as `RepositoryError` wrapped in an
//! `anyhow::Error`, so callers can `downcast_ref` to branch on them while the
//! rest of the crate keeps propagating plain `anyhow::Result`s.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not a repository (or any of the parent directories): {dir}")]
    NotARepository { dir: String },

    #[error("not a valid reference: '{name}'")]
    InvalidReference { name: String },

    #[error("'{name}' is not a valid branch name")]
    InvalidBranchName { name: String },

    #[error("a branch named '{name}' already exists")]
    BranchExists { name: String },

    #[error("cannot {operation} in detached HEAD state")]
    DetachedHead { operation: &'static str },

    #[error("no common ancestor found, refusing to merge unrelated histories")]
    UnrelatedHistories,

    #[error("current branch '{branch}' has no commits yet")]
    NoCommits { branch: String },

    #[error("object {oid} not found or corrupt")]
    ObjectNotFound { oid: String },

    #[error("{message}")]
    LocalChangesWouldBeOverwritten { message: String },

    #[error("nothing to commit, {reason}")]
    NothingToCommit { reason: &'static str },

    #[error("a merge is already in progress, conclude it with a commit first")]
    MergeInProgress,
}
