//! Working tree migration between two trees
//!
//! Moving from one commit's tree to another's (branch switch, fast-forward)
//! involves:
//!
//! 1. Computing the changed paths between the current and target trees
//! 2. Detecting local work the changes would destroy
//! 3. Applying deletions, then writes, to the working tree
//! 4. Bringing the index in line with the target tree
//!
//! ## Conflict Detection
//!
//! - Stale files: a tracked file has changes that are in neither tree
//! - Stale directories: a directory with untracked files is in the way of a file
//! - Untracked overwrites: an untracked file would be replaced
//! - Untracked removals: an untracked file would be deleted
//!
//! All conflicts are collected before the working tree is touched, so a
//! refused migration leaves everything as it was.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::database::FlatTree;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::{TreeChangeType, compare_flat_trees};
use crate::artifacts::index::index_entry::{IndexEntry, parent_dirs};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Set of detected conflicts grouped by type
pub type ConflictsSet = BTreeMap<ConflictType, BTreeSet<String>>;

/// Planner and executor of a migration to a target tree
pub struct Migration<'r> {
    repository: &'r Repository,
    /// Index to update
    index: &'r mut Index,
    /// Changed paths between the current and target trees
    changes: BTreeMap<String, TreeChangeType>,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    /// Migration applying only the paths that differ between `current` and `target`
    pub fn new(
        repository: &'r Repository,
        index: &'r mut Index,
        current: &FlatTree,
        target: &FlatTree,
    ) -> Self {
        Self {
            repository,
            index,
            changes: compare_flat_trees(current, target),
            conflicts: ConflictsSet::new(),
        }
    }

    /// Migration rewriting every file of `target`, not just the changed ones
    pub fn overwrite(
        repository: &'r Repository,
        index: &'r mut Index,
        current: &FlatTree,
        target: &FlatTree,
    ) -> Self {
        let mut changes = compare_flat_trees(current, target);
        for (path, entry) in target {
            changes
                .entry(path.clone())
                .or_insert_with(|| TreeChangeType::Added(entry.clone()));
        }

        Self {
            repository,
            index,
            changes,
            conflicts: ConflictsSet::new(),
        }
    }

    /// Paths to delete from the working tree
    pub fn deletions(&self) -> impl Iterator<Item = &String> {
        self.changes
            .iter()
            .filter(|(_, change)| change.new_entry().is_none())
            .map(|(path, _)| path)
    }

    /// Paths to write, with the blob entry to write there
    pub fn writes(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.changes
            .iter()
            .filter_map(|(path, change)| change.new_entry().map(|entry| (path, entry)))
    }

    /// Apply the migration unless it would destroy local work
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.apply_unchecked()
    }

    /// Apply the migration without looking for conflicts
    pub fn apply_unchecked(&mut self) -> anyhow::Result<()> {
        self.repository.workspace().apply_migration(self)?;
        self.update_index()?;

        tracing::debug!(changes = self.changes.len(), "migrated working tree");

        Ok(())
    }

    fn plan_changes(&mut self) -> anyhow::Result<()> {
        let changes = self
            .changes
            .iter()
            .map(|(path, change)| (path.clone(), change.clone()))
            .collect::<Vec<_>>();

        for (path, change) in &changes {
            self.check_for_conflict(path, change)?;
        }

        if self.conflicts.values().all(BTreeSet::is_empty) {
            return Ok(());
        }

        let message = self
            .conflicts
            .iter()
            .map(|(conflict_type, paths)| conflict_type.report(paths))
            .collect::<Vec<_>>()
            .join("\n");

        Err(RepositoryError::LocalChangesWouldBeOverwritten {
            message: format!("{message}\nAborting"),
        }
        .into())
    }

    fn check_for_conflict(&mut self, path: &str, change: &TreeChangeType) -> anyhow::Result<()> {
        let repository = self.repository;
        let workspace = repository.workspace();
        let inspector = Inspector::new(workspace);
        let entry = self.index.entry_by_path(path);
        let (old_entry, new_entry) = (change.old_entry(), change.new_entry());
        let tracked = entry.is_some();

        if self.index_differs_from_trees(&inspector, entry, old_entry, new_entry) {
            self.record_conflict(ConflictType::StaleFile, path);
            return Ok(());
        }

        if workspace.is_dir(path) {
            if new_entry.is_some() && inspector.contains_untracked_files(path, self.index)? {
                self.record_conflict(ConflictType::StaleDirectory, path);
            }
            return Ok(());
        }

        let stat = workspace.stat_file(path)?;
        let conflict_type = ConflictType::get_conflict_type(tracked, false, new_entry.is_some());

        match stat {
            Some(stat) if tracked => {
                if inspector.check_index_against_workspace(entry, Some(&stat))?
                    != WorkspaceChangeType::None
                {
                    self.record_conflict(conflict_type, path);
                }
            }
            Some(_) => {
                let workspace_oid = inspector.workspace_oid(path)?;
                if workspace_oid.as_ref() != new_entry.map(|entry| &entry.oid) {
                    self.record_conflict(conflict_type, path);
                }
            }
            None => {
                if new_entry.is_some()
                    && let Some(parent) = self.untracked_parent(path)
                {
                    self.record_conflict(ConflictType::UntrackedOverwritten, &parent);
                }
            }
        }

        Ok(())
    }

    /// An untracked file sitting where one of `path`'s parent directories goes
    fn untracked_parent(&self, path: &str) -> Option<String> {
        parent_dirs(path).into_iter().find(|parent| {
            self.repository.workspace().is_file(parent) && !self.index.is_tracked_file(parent)
        })
    }

    fn index_differs_from_trees(
        &self,
        inspector: &Inspector<'_>,
        index_entry: Option<&IndexEntry>,
        old_entry: Option<&DatabaseEntry>,
        new_entry: Option<&DatabaseEntry>,
    ) -> bool {
        inspector.check_index_against_head_tree(index_entry, old_entry) != IndexChangeType::None
            && inspector.check_index_against_head_tree(index_entry, new_entry)
                != IndexChangeType::None
    }

    fn record_conflict(&mut self, conflict_type: ConflictType, path: &str) {
        self.conflicts
            .entry(conflict_type)
            .or_default()
            .insert(path.to_string());
    }

    fn update_index(&mut self) -> anyhow::Result<()> {
        for (path, change) in &self.changes {
            match change.new_entry() {
                None => self.index.remove(path),
                Some(entry) => {
                    let stat = self
                        .repository
                        .workspace()
                        .stat_file(path)?
                        .with_context(|| format!("{path} vanished during checkout"))?;
                    self.index
                        .add(IndexEntry::new(path.clone(), entry.oid.clone(), stat));
                }
            }
        }

        Ok(())
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self.repository.database().load_blob(object_id)?;

        Ok(blob.content().clone())
    }
}
