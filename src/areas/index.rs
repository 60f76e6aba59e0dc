//! Index (staging area)
//!
//! The index tracks which file versions go into the next commit. Every entry
//! records the blob ID of the staged content plus the size and modification
//! time seen when it was staged, so unchanged files can be detected cheaply.
//!
//! ## File Format
//!
//! A pretty-printed JSON object keyed by repository-relative path:
//!
//! ```text
//! {
//!   "dir/file.txt": { "hash": "<oid>", "size": 12, "mtime": 1700000000000 }
//! }
//! ```
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to the files below them, used to drop
//!   entries when a file replaces a directory or the other way round

use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry, IndexRecord};
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`<metadata>/index.json`)
    path: Box<Path>,
    entries: BTreeMap<String, IndexEntry>,
    children: BTreeMap<String, BTreeSet<String>>,
    /// Whether the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn entry_by_path(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    pub fn is_tracked_file(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether the path is a staged file or a directory containing staged files
    pub fn is_directly_tracked(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.children.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = true;
    }

    /// Load the index from disk
    ///
    /// A missing or unparsable index file reads as an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.children.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read index file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(());
        }

        let records = match serde_json::from_str::<BTreeMap<String, IndexRecord>>(&content) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unparsable index");
                return Ok(());
            }
        };

        for (name, record) in records {
            self.store_entry(IndexEntry::from_record(name, record));
        }

        Ok(())
    }

    /// Persist the index, keys in sorted order
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let records = self
            .entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.to_record()))
            .collect::<BTreeMap<_, _>>();

        let content = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Unable to write index file {}", self.path.display()))?;
        self.changed = false;

        Ok(())
    }

    /// Stage an entry, replacing any entry at the same path
    ///
    /// Entries that would clash with the new one in a tree (a file where the
    /// new entry needs a directory, or files below the new entry's path) are
    /// dropped.
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.store_entry(entry);

        self.changed = true;
    }

    /// Unstage a file, or every file below a directory
    pub fn remove(&mut self, name: &str) {
        self.remove_entry(name);
        self.remove_children(name);

        self.changed = true;
    }

    pub fn update_entry_stat(&mut self, name: &str, stat: EntryMetadata) {
        if let Some(existing_entry) = self.entries.get_mut(name) {
            existing_entry.metadata = stat;
            self.changed = true;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(&parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent)
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry);
    }

    fn remove_children(&mut self, name: &str) {
        if let Some(children) = self.children.remove(name) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, name: &str) {
        if let Some(entry) = self.entries.remove(name) {
            for parent in entry.parent_dirs() {
                if let Some(children) = self.children.get_mut(&parent) {
                    children.remove(name);
                    if children.is_empty() {
                        self.children.remove(&parent);
                    }
                }
            }
        }
    }
}
