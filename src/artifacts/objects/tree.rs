//! Tree object
//!
//! Trees represent one directory level. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Building and flattening
//!
//! Trees are built from a flat `path -> oid` mapping (usually the index): every
//! path is split on `/` and intermediate directory trees are created on the way.
//! Entries are kept sorted by name, with directories ordered as if their name
//! ended in `/`, so the same set of files always yields the same tree hash.
//!
//! Reading goes the other way: a tree is decoded one level at a time and
//! [`Tree::flatten`] inlines subtrees under `name/` prefixes.

use crate::artifacts::database::FlatTree;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Internal tree entry used while building
#[derive(Debug, Clone)]
enum TreeEntry {
    /// File entry (blob)
    File(ObjectId),
    /// Directory entry (nested tree)
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File(_) => EntryMode::Regular,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(oid) => Ok(oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing a directory snapshot
///
/// Trees maintain two sets of entries:
/// - `readable_entries`: for trees decoded from the database
/// - `writeable_entries`: for trees being built from a flat mapping
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries decoded from the database (read mode)
    readable_entries: BTreeMap<String, DatabaseEntry>,
    /// Entries being built (write mode); directory keys end with '/'
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree from flat `path -> blob oid` pairs
    ///
    /// # Returns
    ///
    /// The root tree; nested trees are reachable through [`Tree::traverse`]
    pub fn build<'e, I>(entries: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (&'e str, &'e ObjectId)>,
    {
        let mut root = Self::default();

        for (name, oid) in entries {
            let components = name.split('/').collect::<Vec<_>>();
            if components.iter().any(|component| component.is_empty()) {
                anyhow::bail!("invalid path in tree: '{name}'");
            }

            root.add_entry(&components, oid)?;
        }

        Ok(root)
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Visits children before parents (post-order traversal), so a parent is
    /// only stored once every subtree it references exists.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.writeable_entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    fn add_entry(&mut self, components: &[&str], oid: &ObjectId) -> anyhow::Result<()> {
        match components {
            [] => Ok(()),
            [file_name] => {
                if self.writeable_entries.contains_key(&format!("{file_name}/")) {
                    anyhow::bail!("'{file_name}' is both a file and a directory");
                }
                self.writeable_entries
                    .insert(file_name.to_string(), TreeEntry::File(oid.clone()));

                Ok(())
            }
            [dir_name, rest @ ..] => {
                if self.writeable_entries.contains_key(*dir_name) {
                    anyhow::bail!("'{dir_name}' is both a file and a directory");
                }

                let entry = self
                    .writeable_entries
                    .entry(format!("{dir_name}/"))
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));

                match entry {
                    TreeEntry::Directory(tree) => tree.add_entry(rest, oid),
                    TreeEntry::File(_) => unreachable!("directory keys always hold trees"),
                }
            }
        }
    }

    /// Entries of a decoded tree, keyed by entry name
    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    /// Flatten a decoded tree into full relative paths
    ///
    /// Subtrees are loaded through `loader` and inlined with `name/` prefixes.
    pub fn flatten<L>(self, loader: &L) -> anyhow::Result<FlatTree>
    where
        L: Fn(&ObjectId) -> anyhow::Result<Tree>,
    {
        let mut flat = FlatTree::new();
        self.flatten_into(loader, "", &mut flat)?;

        Ok(flat)
    }

    fn flatten_into<L>(self, loader: &L, prefix: &str, flat: &mut FlatTree) -> anyhow::Result<()>
    where
        L: Fn(&ObjectId) -> anyhow::Result<Tree>,
    {
        for (name, entry) in self.into_entries() {
            let path = format!("{prefix}{name}");

            if entry.is_tree() {
                let subtree = loader(&entry.oid)
                    .with_context(|| format!("unable to load subtree '{path}'"))?;
                subtree.flatten_into(loader, &format!("{path}/"), flat)?;
            } else {
                flat.insert(path, entry);
            }
        }

        Ok(())
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (name, tree_entry) in &self.writeable_entries {
            let name = name.trim_end_matches('/');

            write!(content_bytes, "{} {}", tree_entry.mode().as_str(), name)?;
            content_bytes.push(0);
            tree_entry.oid()?.write_h40_to(&mut content_bytes)?;
        }

        Ok(Bytes::from(content_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }
            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
