use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::FlatTree;
use crate::artifacts::diff::hunk::diff_hunks;
use crate::artifacts::objects::object::hash_object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

const NULL_PATH: &str = "/dev/null";

/// One side of a file diff; `oid` and `data` are `None` when the file does
/// not exist on that side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTarget {
    pub file: String,
    pub oid: Option<ObjectId>,
    pub data: Option<String>,
}

impl DiffTarget {
    pub fn missing(file: &str) -> Self {
        Self {
            file: file.to_string(),
            oid: None,
            data: None,
        }
    }

    fn from_blob(file: &str, oid: &ObjectId, database: &Database) -> anyhow::Result<Self> {
        let blob = database.load_blob(oid)?;

        Ok(Self {
            file: file.to_string(),
            oid: Some(oid.clone()),
            data: Some(blob.text().into_owned()),
        })
    }

    pub fn from_tree(file: &str, tree: &FlatTree, database: &Database) -> anyhow::Result<Self> {
        match tree.get(file) {
            Some(entry) => Self::from_blob(file, &entry.oid, database),
            None => Ok(Self::missing(file)),
        }
    }

    pub fn from_index(file: &str, index: &Index, database: &Database) -> anyhow::Result<Self> {
        match index.entry_by_path(file) {
            Some(entry) => Self::from_blob(file, &entry.oid, database),
            None => Ok(Self::missing(file)),
        }
    }

    pub fn from_workspace(file: &str, workspace: &Workspace) -> anyhow::Result<Self> {
        match workspace.read_file(file)? {
            Some(content) => Ok(Self {
                file: file.to_string(),
                oid: Some(hash_object(ObjectType::Blob, &content)?),
                data: Some(String::from_utf8_lossy(&content).into_owned()),
            }),
            None => Ok(Self::missing(file)),
        }
    }

    fn display_path(&self, prefix: &str) -> String {
        match self.oid {
            Some(_) => format!("{prefix}/{}", self.file),
            None => NULL_PATH.to_string(),
        }
    }
}

/// Unified diff of one file, empty when both sides hold the same content
pub fn format_file_diff(a: &DiffTarget, b: &DiffTarget, context: usize) -> String {
    if a.oid == b.oid {
        return String::new();
    }

    let mut output = format!(
        "diff --git a/{} b/{}\n--- {}\n+++ {}\n",
        a.file,
        b.file,
        a.display_path("a"),
        b.display_path("b")
    );
    output.push_str(&diff_hunks(
        a.data.as_deref().unwrap_or_default(),
        b.data.as_deref().unwrap_or_default(),
        context,
    ));

    output
}
