use crate::areas::index::Index;
use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::database::FlatTree;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::commit_graph::CommitGraph;
use crate::artifacts::merge::conflict::{
    conflicted_merge_message, merge_subject, render_conflict_markers,
};
use crate::artifacts::merge::three_way::MergePlan;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;

/// The two branch tips being merged
struct MergeInputs {
    current_branch: BranchName,
    incoming_branch: BranchName,
    current_oid: ObjectId,
    incoming_oid: ObjectId,
}

impl Repository {
    /// Merge `branch` into the checked-out branch
    ///
    /// Moves the branch when it is behind, otherwise merges the two trees
    /// against their merge base. Conflicts are not an error: the conflicted
    /// files receive markers, the merge state is saved and
    /// `MergeOutcome::Conflicted` is returned.
    pub async fn merge(&mut self, branch: &str) -> anyhow::Result<MergeOutcome> {
        if self.refs().merge_head()?.is_some() {
            return Err(RepositoryError::MergeInProgress.into());
        }

        let current_branch = match self.refs().head()? {
            Head::Branch(name) => name,
            Head::Detached(_) => {
                return Err(RepositoryError::DetachedHead { operation: "merge" }.into());
            }
        };
        let invalid_reference = || RepositoryError::InvalidReference {
            name: branch.to_string(),
        };
        let incoming_branch =
            BranchName::try_parse(branch.to_string()).map_err(|_| invalid_reference())?;

        if incoming_branch == current_branch {
            writeln!(
                self.writer(),
                "{}",
                format!("Already on branch '{current_branch}', nothing to merge").yellow()
            )?;
            return Ok(MergeOutcome::AlreadyOnBranch);
        }

        if !self.refs().branch_exists(&incoming_branch) {
            return Err(invalid_reference().into());
        }
        let incoming_oid = self
            .refs()
            .read_branch(&incoming_branch)?
            .ok_or_else(invalid_reference)?;
        let current_oid = self.refs().read_branch(&current_branch)?.ok_or_else(|| {
            RepositoryError::NoCommits {
                branch: current_branch.to_string(),
            }
        })?;

        if current_oid == incoming_oid {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let inputs = MergeInputs {
            current_branch,
            incoming_branch,
            current_oid,
            incoming_oid,
        };

        let database = self.database();
        let graph = CommitGraph::new(|oid: &ObjectId| {
            database
                .try_load_commit(oid)
                .map(|commit| commit.parents().to_vec())
        });

        if graph.is_fast_forward(&inputs.current_oid, &inputs.incoming_oid) {
            tracing::info!(from = %inputs.current_oid, to = %inputs.incoming_oid, "fast-forward merge");
            return self.fast_forward(inputs).await;
        }

        let base_oid = graph
            .common_ancestor(&inputs.current_oid, &inputs.incoming_oid)
            .ok_or(RepositoryError::UnrelatedHistories)?;
        tracing::info!(base = %base_oid, "three-way merge");

        self.three_way_merge(inputs, &base_oid).await
    }

    async fn fast_forward(&self, inputs: MergeInputs) -> anyhow::Result<MergeOutcome> {
        let current_tree = self.database().read_commit_tree(&inputs.current_oid)?;
        let incoming_tree = self.database().read_commit_tree(&inputs.incoming_oid)?;

        self.refs()
            .update_branch(&inputs.current_branch, &inputs.incoming_oid)?;

        {
            let index = self.index();
            let mut index = index.lock().await;

            index.rehydrate()?;
            Migration::overwrite(self, &mut index, &current_tree, &incoming_tree)
                .apply_unchecked()?;
            index.write_updates()?;
        }

        writeln!(
            self.writer(),
            "Updating {}..{}\nFast-forward",
            inputs.current_oid.to_short_oid(),
            inputs.incoming_oid.to_short_oid()
        )?;

        Ok(MergeOutcome::FastForward {
            from: inputs.current_oid,
            to: inputs.incoming_oid,
        })
    }

    async fn three_way_merge(
        &self,
        inputs: MergeInputs,
        base_oid: &ObjectId,
    ) -> anyhow::Result<MergeOutcome> {
        let base_tree = self.database().read_commit_tree(base_oid)?;
        let current_tree = self.database().read_commit_tree(&inputs.current_oid)?;
        let incoming_tree = self.database().read_commit_tree(&inputs.incoming_oid)?;

        let plan = MergePlan::classify(&base_tree, &current_tree, &incoming_tree);

        if plan.has_conflicts() {
            return self.record_conflicts(&inputs, &plan);
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.apply_clean_changes(&plan, &mut index)?;
        self.refresh_index(&current_tree, &incoming_tree, &mut index)?;
        index.write_updates()?;

        let tree = Tree::build(
            index
                .entries()
                .map(|entry| (entry.name.as_str(), &entry.oid)),
        )?;
        let tree_oid = self.database().store_tree(&tree)?;
        let message = merge_subject(
            inputs.incoming_branch.as_ref(),
            inputs.current_branch.as_ref(),
        );
        let commit = self.write_commit(
            vec![inputs.current_oid.clone(), inputs.incoming_oid.clone()],
            tree_oid,
            message,
        )?;
        let commit_oid = commit.object_id()?;

        writeln!(self.writer(), "Merge made by the 'three-way' strategy.")?;

        Ok(MergeOutcome::Merged { commit: commit_oid })
    }

    /// Take over incoming additions, modifications and deletions in the
    /// working tree and the index
    fn apply_clean_changes(&self, plan: &MergePlan, index: &mut Index) -> anyhow::Result<()> {
        for path in plan.deletions() {
            self.workspace().remove_file(path)?;
            index.remove(path);
        }

        for (path, entry) in plan.writes() {
            let blob = self.database().load_blob(&entry.oid)?;
            self.workspace().write_file(path, blob.content())?;
            if let Some(stat) = self.workspace().stat_file(path)? {
                index.add(IndexEntry::new(path.clone(), entry.oid.clone(), stat));
            }
        }

        Ok(())
    }

    /// Write conflict markers and the merge state; nothing else of the
    /// incoming side reaches the working tree or the index
    fn record_conflicts(
        &self,
        inputs: &MergeInputs,
        plan: &MergePlan,
    ) -> anyhow::Result<MergeOutcome> {
        for (path, conflict) in plan.conflicts() {
            let ours = self.blob_text(conflict.ours.as_ref())?;
            let theirs = self.blob_text(conflict.theirs.as_ref())?;

            self.workspace()
                .write_file(path, render_conflict_markers(&ours, &theirs).as_bytes())?;
        }

        let message = conflicted_merge_message(
            inputs.incoming_branch.as_ref(),
            inputs.current_branch.as_ref(),
            plan.conflicts().keys(),
        );
        self.refs()
            .write_merge_state(&inputs.incoming_oid, &message)?;

        let mut writer = self.writer();
        for (path, conflict) in plan.conflicts() {
            writeln!(
                writer,
                "{}",
                format!(
                    "CONFLICT ({}): Merge conflict in {path}",
                    conflict.kind.describe()
                )
                .red()
            )?;
        }
        writeln!(
            writer,
            "Automatic merge failed; fix conflicts and then commit the result."
        )?;

        Ok(MergeOutcome::Conflicted {
            conflicts: plan.conflicts().keys().cloned().collect(),
        })
    }

    /// Re-hash every path of either side from disk; paths gone from disk
    /// leave the index
    fn refresh_index(
        &self,
        current_tree: &FlatTree,
        incoming_tree: &FlatTree,
        index: &mut Index,
    ) -> anyhow::Result<()> {
        let paths = current_tree
            .keys()
            .chain(incoming_tree.keys())
            .collect::<BTreeSet<_>>();

        for path in paths {
            match (
                self.workspace().parse_blob(path)?,
                self.workspace().stat_file(path)?,
            ) {
                (Some(blob), Some(stat)) => {
                    let blob_id = self.database().store(&blob)?;
                    index.add(IndexEntry::new(path.clone(), blob_id, stat));
                }
                _ => index.remove(path),
            }
        }

        Ok(())
    }

    fn blob_text(&self, oid: Option<&ObjectId>) -> anyhow::Result<String> {
        match oid {
            Some(oid) => Ok(self.database().load_blob(oid)?.text().into_owned()),
            None => Ok(String::new()),
        }
    }
}
