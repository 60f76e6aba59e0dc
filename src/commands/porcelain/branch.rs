use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// List branches sorted by name, marking the current one with `*`
    pub async fn list_branches(&mut self) -> anyhow::Result<Vec<BranchName>> {
        let branches = self.refs().list_branches()?;
        let head = self.refs().head()?;
        let mut writer = self.writer();

        if branches.is_empty() {
            writeln!(writer, "No branches yet")?;
        }
        for branch in &branches {
            if head.branch() == Some(branch) {
                writeln!(writer, "{}", format!("* {branch}").green())?;
            } else {
                writeln!(writer, "  {branch}")?;
            }
        }

        Ok(branches)
    }

    /// Create a branch at `start_point`, or at the current commit
    pub async fn create_branch(
        &mut self,
        name: &str,
        start_point: Option<&str>,
    ) -> anyhow::Result<ObjectId> {
        let branch_name = BranchName::try_parse(name.to_string())?;

        let source_oid = match start_point {
            Some(revision) => self.resolve_revision(revision)?,
            None => self.current_branch_tip("create a branch")?,
        };

        self.refs().create_branch(&branch_name, &source_oid)?;
        tracing::info!(branch = %branch_name, oid = %source_oid, "created branch");

        Ok(source_oid)
    }

    /// Tip of the checked-out branch; fails when detached or without commits
    pub(crate) fn current_branch_tip(&self, operation: &'static str) -> anyhow::Result<ObjectId> {
        match self.refs().head()? {
            Head::Branch(branch) => self.refs().read_branch(&branch)?.ok_or_else(|| {
                RepositoryError::NoCommits {
                    branch: branch.to_string(),
                }
                .into()
            }),
            Head::Detached(_) => Err(RepositoryError::DetachedHead { operation }.into()),
        }
    }
}
