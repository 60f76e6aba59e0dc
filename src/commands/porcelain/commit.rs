use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Record the index as a new commit on top of HEAD
    ///
    /// While a merge is in progress the commit gets the incoming commit as
    /// second parent, falls back to the prepared merge message, and clears
    /// the merge state.
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit {
                reason: "the index is empty (use \"add\" to stage files)",
            }
            .into());
        }

        let parent = self.refs().read_head()?;
        let merge_head = self.refs().merge_head()?;

        let tree = Tree::build(
            index
                .entries()
                .map(|entry| (entry.name.as_str(), &entry.oid)),
        )?;
        let tree_oid = self.database().store_tree(&tree)?;

        if merge_head.is_none()
            && let Some(parent) = &parent
            && self.database().load_commit(parent)?.tree_oid() == &tree_oid
        {
            return Err(RepositoryError::NothingToCommit {
                reason: "working tree clean",
            }
            .into());
        }

        let message = match message.trim() {
            "" if merge_head.is_some() => self.refs().merge_message()?.unwrap_or_default(),
            message => message.to_string(),
        };
        if message.trim().is_empty() {
            anyhow::bail!("Aborting commit due to empty commit message");
        }

        let is_root = parent.is_none();
        let parents = parent.into_iter().chain(merge_head.clone()).collect();
        let commit = self.write_commit(parents, tree_oid, message)?;

        if merge_head.is_some() {
            self.refs().clear_merge_state()?;
        }

        let commit_oid = commit.object_id()?;
        let head_label = match self.refs().head()? {
            Head::Branch(name) => name.to_string(),
            Head::Detached(_) => "detached HEAD".to_string(),
        };
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            head_label,
            if is_root { " (root-commit)" } else { "" },
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_oid)
    }

    /// Store a commit and advance HEAD to it
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        message: String,
    ) -> anyhow::Result<Commit> {
        let author = Author::load_from_env();
        let commit = Commit::new(parents, tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;

        self.refs().update_head(&commit_oid)?;
        tracing::info!(
            oid = %commit_oid,
            parents = commit.parents().len(),
            "created commit"
        );

        Ok(commit)
    }
}
