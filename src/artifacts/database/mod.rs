//! Database entry types

use std::collections::BTreeMap;

pub mod database_entry;

/// A tree flattened into full relative paths (`dir/sub/file.txt`) mapped to
/// their blob entries
pub type FlatTree = BTreeMap<String, database_entry::DatabaseEntry>;
