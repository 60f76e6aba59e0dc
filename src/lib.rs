//! A minimal content-addressed version-control engine.
//!
//! The crate is split into three layers:
//!
//! - `areas`: the stateful parts of a repository (object database, index, refs, workspace)
//! - `artifacts`: data types and algorithms (objects, tree/commit codecs, merge, diff)
//! - `commands`: user-facing operations implemented on top of `Repository`

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use areas::repository::Repository;
pub use artifacts::core::error::RepositoryError;
