use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;

/// Compares index entries against the working tree and against a tree
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl<'r> Inspector<'r> {
    /// Whether a working tree directory holds any file the index does not track
    pub fn contains_untracked_files(&self, dir: &str, index: &Index) -> anyhow::Result<bool> {
        Ok(self
            .workspace
            .list_files(Some(dir))?
            .iter()
            .any(|file| !index.is_tracked_file(file)))
    }

    /// Blob ID of the working tree file, `None` if it is gone
    pub fn workspace_oid(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        self.workspace
            .parse_blob(name)?
            .map(|blob| blob.object_id())
            .transpose()
    }

    fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        Ok(self.workspace_oid(&index_entry.name)?.as_ref() != Some(&index_entry.oid))
    }

    /// Compare a staged entry with the file on disk
    ///
    /// Matching size and modification time count as unchanged without reading
    /// the file; a size mismatch is a modification; otherwise the content is
    /// hashed.
    pub fn check_index_against_workspace(
        &self,
        entry: Option<&IndexEntry>,
        stat: Option<&EntryMetadata>,
    ) -> anyhow::Result<WorkspaceChangeType> {
        match (entry, stat) {
            (None, _) => Ok(WorkspaceChangeType::None),
            (Some(_), None) => Ok(WorkspaceChangeType::Deleted),
            (Some(entry), Some(stat)) if entry.stat_match(stat) => Ok(WorkspaceChangeType::None),
            (Some(entry), Some(stat)) if entry.metadata.size != stat.size => {
                Ok(WorkspaceChangeType::Modified)
            }
            (Some(entry), Some(_)) if self.is_content_changed(entry)? => {
                Ok(WorkspaceChangeType::Modified)
            }
            _ => Ok(WorkspaceChangeType::None),
        }
    }

    pub fn check_index_against_head_tree(
        &self,
        index_entry: Option<&IndexEntry>,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match (index_entry, head_entry) {
            (Some(index_entry), Some(head_entry)) if head_entry.oid != index_entry.oid => {
                IndexChangeType::Modified
            }
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            _ => IndexChangeType::None,
        }
    }
}
