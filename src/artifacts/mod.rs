//! Version-control data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch names and HEAD references
//! - `checkout`: Tree-to-tree working tree migrations and conflict detection
//! - `core`: Shared error taxonomy
//! - `database`: Flattened tree entries
//! - `diff`: Myers' line diff and unified diff formatting
//! - `index`: Index/staging area entries
//! - `log`: Commit history traversal
//! - `merge`: Commit graph walking and three-way merge classification
//! - `objects`: Object types (blob, tree, commit)
//! - `status`: Working tree status classification

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
