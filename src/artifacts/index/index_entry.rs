use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// A staged file
///
/// `name` is the repository-relative path with `/` separators; it is the key
/// of the JSON document and therefore not part of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub name: String,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

/// File size and modification time recorded when the file was staged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct EntryMetadata {
    pub size: u64,
    /// Modification time in milliseconds since the Unix epoch
    pub mtime: i64,
}

impl TryFrom<&std::fs::Metadata> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from(metadata: &std::fs::Metadata) -> anyhow::Result<Self> {
        let mtime = metadata
            .modified()?
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis() as i64)
            .unwrap_or_default();

        Ok(Self::new(metadata.len(), mtime))
    }
}

/// On-disk JSON record of an index entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IndexRecord {
    pub hash: ObjectId,
    pub size: u64,
    pub mtime: i64,
}

impl IndexEntry {
    /// Parent directories of the entry, outermost first
    ///
    /// `a/b/c.txt` yields `["a", "a/b"]`.
    pub fn parent_dirs(&self) -> Vec<String> {
        parent_dirs(&self.name)
    }

    /// Whether the recorded stat still matches the file on disk
    pub fn stat_match(&self, metadata: &EntryMetadata) -> bool {
        self.metadata == *metadata
    }

    pub(crate) fn from_record(name: String, record: IndexRecord) -> Self {
        Self::new(
            name,
            record.hash,
            EntryMetadata::new(record.size, record.mtime),
        )
    }

    pub(crate) fn to_record(&self) -> IndexRecord {
        IndexRecord {
            hash: self.oid.clone(),
            size: self.metadata.size,
            mtime: self.metadata.mtime,
        }
    }
}

/// Parent directories of a `/`-separated path, outermost first
pub fn parent_dirs(name: &str) -> Vec<String> {
    let components = name.split('/').collect::<Vec<_>>();

    (1..components.len())
        .map(|depth| components[..depth].join("/"))
        .collect()
}

/// Convert a relative file system path into the `/`-separated form used as
/// index and tree key
///
/// `.` components are dropped and `..` pops the previous component. `None`
/// when the path climbs above its starting point.
pub fn to_entry_name(path: &Path) -> Option<String> {
    let mut names = Vec::new();

    for component in path.components() {
        match component {
            Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                names.pop()?;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(names.join("/"))
}
