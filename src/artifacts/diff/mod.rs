//! Diff algorithms and tree comparison
//!
//! - `diff_algorithm`: Myers' diff for line-by-line comparison
//! - `hunk`: grouping of edits into unified-diff hunks with context
//! - `diff_target`: one side of a file diff (workspace, index or commit)
//! - `tree_diff`: path-level comparison of two flattened trees
//!
//! Merging never consults these: it compares blob IDs. Line diffs are only
//! used for human-readable output.

pub mod diff_algorithm;
pub mod diff_target;
pub mod hunk;
pub mod tree_diff;

/// Lines of context around each change in a hunk
pub const DEFAULT_CONTEXT: usize = 3;
