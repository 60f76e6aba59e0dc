//! Core repository components
//!
//! This module contains the stateful building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area, persisted as a JSON document
//! - `refs`: Reference management (branches, HEAD, merge state)
//! - `repository`: Repository context tying the areas together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
