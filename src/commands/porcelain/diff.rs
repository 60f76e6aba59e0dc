use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::FlatTree;
use crate::artifacts::diff::DEFAULT_CONTEXT;
use crate::artifacts::diff::diff_target::{DiffTarget, format_file_diff};
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;

/// Which two sides `diff` compares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Compare HEAD (or the single given commit) against the index
    pub staged: bool,
    /// Zero, one or two revisions
    pub commits: Vec<String>,
}

impl Repository {
    /// Print unified diffs between two of: a commit, the index, the working tree
    ///
    /// - no revision: index against working tree
    /// - `staged`: HEAD (or the given revision) against index
    /// - one revision: that commit against working tree
    /// - two revisions: commit against commit
    pub async fn diff(&mut self, options: &DiffOptions) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let patches = match (options.staged, options.commits.as_slice()) {
            (_, [from, to]) => {
                let from = self.revision_tree(from)?;
                let to = self.revision_tree(to)?;
                self.diff_trees(&from, &to)?
            }
            (true, [revision]) => {
                let tree = self.revision_tree(revision)?;
                self.diff_tree_index(&tree, &index)?
            }
            (true, []) => {
                let tree = self.head_tree()?;
                self.diff_tree_index(&tree, &index)?
            }
            (false, [revision]) => {
                let tree = self.revision_tree(revision)?;
                self.diff_tree_workspace(&tree, &index)?
            }
            (false, []) => self.diff_index_workspace(&index)?,
            (_, revisions) => {
                anyhow::bail!("too many revisions: expected at most 2, got {}", revisions.len())
            }
        };

        let mut writer = self.writer();
        for patch in patches {
            for line in patch.lines() {
                writeln!(writer, "{}", colorize_diff_line(line))?;
            }
        }

        Ok(())
    }

    fn revision_tree(&self, revision: &str) -> anyhow::Result<FlatTree> {
        let commit_oid = self.resolve_revision(revision)?;
        self.database().read_commit_tree(&commit_oid)
    }

    fn diff_trees(&self, from: &FlatTree, to: &FlatTree) -> anyhow::Result<Vec<String>> {
        let paths = from.keys().chain(to.keys()).collect::<BTreeSet<_>>();

        paths
            .into_iter()
            .map(|path| {
                Ok(format_file_diff(
                    &DiffTarget::from_tree(path, from, self.database())?,
                    &DiffTarget::from_tree(path, to, self.database())?,
                    DEFAULT_CONTEXT,
                ))
            })
            .collect()
    }

    fn diff_tree_index(&self, tree: &FlatTree, index: &Index) -> anyhow::Result<Vec<String>> {
        let paths = tree
            .keys()
            .cloned()
            .chain(index.entries().map(|entry| entry.name.clone()))
            .collect::<BTreeSet<_>>();

        paths
            .iter()
            .map(|path| {
                Ok(format_file_diff(
                    &DiffTarget::from_tree(path, tree, self.database())?,
                    &DiffTarget::from_index(path, index, self.database())?,
                    DEFAULT_CONTEXT,
                ))
            })
            .collect()
    }

    fn diff_tree_workspace(&self, tree: &FlatTree, index: &Index) -> anyhow::Result<Vec<String>> {
        let paths = tree
            .keys()
            .cloned()
            .chain(index.entries().map(|entry| entry.name.clone()))
            .collect::<BTreeSet<_>>();

        paths
            .iter()
            .map(|path| {
                Ok(format_file_diff(
                    &DiffTarget::from_tree(path, tree, self.database())?,
                    &DiffTarget::from_workspace(path, self.workspace())?,
                    DEFAULT_CONTEXT,
                ))
            })
            .collect()
    }

    fn diff_index_workspace(&self, index: &Index) -> anyhow::Result<Vec<String>> {
        index
            .entries()
            .map(|entry| {
                Ok(format_file_diff(
                    &DiffTarget::from_index(&entry.name, index, self.database())?,
                    &DiffTarget::from_workspace(&entry.name, self.workspace())?,
                    DEFAULT_CONTEXT,
                ))
            })
            .collect()
    }
}

fn colorize_diff_line(line: &str) -> String {
    if line.starts_with("diff --git") || line.starts_with("--- ") || line.starts_with("+++ ") {
        line.bold().to_string()
    } else if line.starts_with("@@") {
        line.cyan().to_string()
    } else if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else {
        line.to_string()
    }
}
