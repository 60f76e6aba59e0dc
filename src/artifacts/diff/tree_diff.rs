use crate::artifacts::database::FlatTree;
use crate::artifacts::database::database_entry::DatabaseEntry;
use std::collections::BTreeMap;

/// How a path differs between two flattened trees
#[derive(Debug, Clone, PartialEq)]
pub enum TreeChangeType {
    Added(DatabaseEntry),
    Deleted(DatabaseEntry),
    Modified {
        old: DatabaseEntry,
        new: DatabaseEntry,
    },
}

impl TreeChangeType {
    pub fn from_entries(old: Option<DatabaseEntry>, new: Option<DatabaseEntry>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChangeType::Added(new)),
            (Some(old), None) => Some(TreeChangeType::Deleted(old)),
            (Some(old), Some(new)) if old != new => Some(TreeChangeType::Modified { old, new }),
            _ => None,
        }
    }

    pub fn old_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Deleted(entry) => Some(entry),
            TreeChangeType::Modified { old, .. } => Some(old),
            TreeChangeType::Added(_) => None,
        }
    }

    pub fn new_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Added(entry) => Some(entry),
            TreeChangeType::Modified { new, .. } => Some(new),
            TreeChangeType::Deleted(_) => None,
        }
    }
}

/// Paths whose entry differs between `old` and `new`, sorted by path
pub fn compare_flat_trees(old: &FlatTree, new: &FlatTree) -> BTreeMap<String, TreeChangeType> {
    old.keys()
        .chain(new.keys())
        .filter_map(|path| {
            TreeChangeType::from_entries(old.get(path).cloned(), new.get(path).cloned())
                .map(|change| (path.clone(), change))
        })
        .collect()
}
