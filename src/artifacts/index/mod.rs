//! Index (staging area) data structures
//!
//! The index is persisted as a JSON document mapping each repository-relative
//! path to the blob it stages plus the file size and modification time seen
//! when it was staged. Size and mtime let status skip re-hashing files that
//! have not been touched.

pub mod entry_mode;
pub mod index_entry;
