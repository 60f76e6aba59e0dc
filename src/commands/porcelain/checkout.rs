use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::RepositoryError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Switch to a branch, creating it at the current commit with `create_new`
    ///
    /// Switching migrates the working tree and the index from the current
    /// commit's tree to the branch's tree, and refuses when that would
    /// destroy uncommitted work.
    pub async fn checkout(&mut self, name: &str, create_new: bool) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        if self.refs().merge_head()?.is_some() {
            return Err(RepositoryError::MergeInProgress.into());
        }

        if create_new {
            let source_oid = self.refs().read_head()?.ok_or_else(|| {
                RepositoryError::InvalidReference {
                    name: "HEAD".to_string(),
                }
            })?;
            self.refs().create_branch(&branch_name, &source_oid)?;
            self.refs().set_head_branch(&branch_name)?;

            writeln!(
                self.writer(),
                "{}",
                format!("Switched to a new branch '{branch_name}'").green()
            )?;
            return Ok(());
        }

        if !self.refs().branch_exists(&branch_name) {
            return Err(RepositoryError::InvalidReference {
                name: name.to_string(),
            }
            .into());
        }

        if self.refs().head()?.branch() == Some(&branch_name) {
            writeln!(
                self.writer(),
                "{}",
                format!("Already on '{branch_name}'").yellow()
            )?;
            return Ok(());
        }

        let target_oid = self.refs().read_branch(&branch_name)?.ok_or_else(|| {
            RepositoryError::InvalidReference {
                name: name.to_string(),
            }
        })?;
        let current_tree = self.head_tree()?;
        let target_tree = self.database().read_commit_tree(&target_oid)?;

        {
            let index = self.index();
            let mut index = index.lock().await;

            index.rehydrate()?;
            Migration::new(self, &mut index, &current_tree, &target_tree).apply_changes()?;
            index.write_updates()?;
        }

        self.refs().set_head_branch(&branch_name)?;
        tracing::info!(branch = %branch_name, oid = %target_oid, "switched branch");
        writeln!(
            self.writer(),
            "{}",
            format!("Switched to branch '{branch_name}'").green()
        )?;

        Ok(())
    }
}
