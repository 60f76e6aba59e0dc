use crate::areas::index::Index;
use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::database::FlatTree;
use crate::artifacts::index::index_entry::{IndexEntry, parent_dirs};
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, FileChangeType>;
pub type FileSet = BTreeSet<String>;

/// Snapshot of the differences between HEAD, the index and the working tree
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub(crate) head: Head,
    pub(crate) merge_in_progress: bool,
    /// Untracked files; directories without any tracked file are collapsed to `dir/`
    pub(crate) untracked_files: FileSet,
    pub(crate) changed_files: BTreeMap<String, FileChange>,
}

impl StatusInfo {
    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn merge_in_progress(&self) -> bool {
        self.merge_in_progress
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    pub fn changed_files(&self) -> &BTreeMap<String, FileChange> {
        &self.changed_files
    }

    /// Staged changes: index against the HEAD tree
    pub fn index_changeset(&self) -> ChangeSet {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| (file.clone(), FileChangeType::Index(change.index_change)))
            .collect()
    }

    /// Unstaged changes: working tree against the index
    pub fn workspace_changeset(&self) -> ChangeSet {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change),
                )
            })
            .collect()
    }

    pub fn untracked_changeset(&self) -> ChangeSet {
        self.untracked_files
            .iter()
            .map(|file| (file.clone(), FileChangeType::Untracked))
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    /// Collect the status of every path
    ///
    /// Entries whose content turned out unchanged despite a stale stat get
    /// their stat refreshed in `index`, so the next run skips hashing them.
    pub fn initialize(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.repository.workspace());
        let head_tree = self.repository.head_tree()?;

        let untracked_files = self.scan_workspace(index)?;
        let mut changed_files = BTreeMap::<String, FileChange>::new();

        let index_entries = index.entries().cloned().collect::<Vec<_>>();
        for entry in &index_entries {
            self.check_index_entry_against_workspace(entry, index, &inspector, &mut changed_files)?;
            self.check_index_entry_against_head_tree(entry, &head_tree, &inspector, &mut changed_files);
        }
        self.collect_deleted_head_files(&head_tree, index, &mut changed_files);

        Ok(StatusInfo {
            head: self.repository.refs().head()?,
            merge_in_progress: self.repository.refs().merge_head()?.is_some(),
            untracked_files,
            changed_files,
        })
    }

    fn scan_workspace(&self, index: &Index) -> anyhow::Result<FileSet> {
        let files = self.repository.workspace().list_files(None)?;

        Ok(files
            .into_iter()
            .filter(|file| !index.is_tracked_file(file))
            .map(|file| {
                parent_dirs(&file)
                    .into_iter()
                    .find(|dir| !index.is_directly_tracked(dir))
                    .map(|dir| format!("{dir}/"))
                    .unwrap_or(file)
            })
            .collect())
    }

    fn check_index_entry_against_workspace(
        &self,
        index_entry: &IndexEntry,
        index: &mut Index,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<String, FileChange>,
    ) -> anyhow::Result<()> {
        let stat = self.repository.workspace().stat_file(&index_entry.name)?;
        let status = inspector.check_index_against_workspace(Some(index_entry), stat.as_ref())?;

        if status != WorkspaceChangeType::None {
            changed_files
                .entry(index_entry.name.clone())
                .or_default()
                .workspace_change = status;
        } else if let Some(stat) = stat
            && !index_entry.stat_match(&stat)
        {
            index.update_entry_stat(&index_entry.name, stat);
        }

        Ok(())
    }

    fn check_index_entry_against_head_tree(
        &self,
        index_entry: &IndexEntry,
        head_tree: &FlatTree,
        inspector: &Inspector<'_>,
        changed_files: &mut BTreeMap<String, FileChange>,
    ) {
        let head_entry = head_tree.get(&index_entry.name);
        let status = inspector.check_index_against_head_tree(Some(index_entry), head_entry);

        if status != IndexChangeType::None {
            changed_files
                .entry(index_entry.name.clone())
                .or_default()
                .index_change = status;
        }
    }

    fn collect_deleted_head_files(
        &self,
        head_tree: &FlatTree,
        index: &Index,
        changed_files: &mut BTreeMap<String, FileChange>,
    ) {
        for path in head_tree.keys() {
            if !index.is_tracked_file(path) {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        }
    }
}
