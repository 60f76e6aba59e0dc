//! Working tree status inspection
//!
//! Compares the HEAD tree, the index and the working tree.
//!
//! ## Components
//!
//! - `file_change`: Enum types for categorizing changes
//! - `inspector`: Per-file comparisons
//! - `status_info`: Status collection over the whole repository

pub mod file_change;
pub mod inspector;
pub mod status_info;
