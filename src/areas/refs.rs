//! References (HEAD, branches and merge state)
//!
//! ## Reference Types
//!
//! - HEAD: the current branch (`ref: refs/heads/<name>`) or, when detached, a raw commit ID
//! - Branches: `refs/heads/*`, one file per branch holding the tip commit ID
//!
//! A branch whose ref file does not exist yet is *unborn*: HEAD can point to
//! it, but it has no commits.
//!
//! ## Merge state
//!
//! While a conflicted merge waits for resolution, `MERGE_HEAD` holds the
//! incoming commit ID and `MERGE_MSG` the prepared commit message.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Prefix of a symbolic ref file
const SYMREF_PREFIX: &str = "ref: ";

pub const HEAD_FILE: &str = "HEAD";
pub const MERGE_HEAD_FILE: &str = "MERGE_HEAD";
pub const MERGE_MSG_FILE: &str = "MERGE_MSG";

/// What HEAD points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Attached to a branch, which may not have commits yet
    Branch(BranchName),
    /// Detached at a commit
    Detached(ObjectId),
}

impl Head {
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Branch(name) => Some(name),
            Head::Detached(_) => None,
        }
    }
}

/// References manager rooted at the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Read HEAD without resolving it
    pub fn head(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {head_path:?}"))?;
        let content = content.trim();

        match content.strip_prefix(SYMREF_PREFIX) {
            Some(ref_path) => Ok(Head::Branch(BranchName::try_parse_ref_path(ref_path.trim())?)),
            None => Ok(Head::Detached(
                ObjectId::try_parse(content.to_string()).context("HEAD is corrupt")?,
            )),
        }
    }

    /// The commit HEAD points to, `None` on an unborn branch
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.head()? {
            Head::Branch(name) => self.read_branch(&name),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Advance HEAD: the current branch when attached, HEAD itself when detached
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.head()? {
            Head::Branch(name) => self.update_branch(&name, oid),
            Head::Detached(_) => self.set_head_detached(oid),
        }
    }

    pub fn set_head_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            &format!("{SYMREF_PREFIX}{}", name.to_ref_path()),
        )
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), oid.as_ref())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Tip of a branch, `None` if the branch has no commits
    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let path = self.branch_path(name);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ref file at {path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ObjectId::try_parse(content.to_string()).with_context(
                || format!("branch {name} is corrupt"),
            )?))
        }
    }

    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(name), oid.as_ref())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(RepositoryError::BranchExists {
                name: name.to_string(),
            }
            .into());
        }

        self.update_branch(name, source_oid)
    }

    /// All branches with at least one commit, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    pub fn write_merge_state(&self, incoming: &ObjectId, message: &str) -> anyhow::Result<()> {
        self.update_ref_file(&self.path.join(MERGE_HEAD_FILE), incoming.as_ref())?;
        std::fs::write(self.path.join(MERGE_MSG_FILE), message)
            .context("failed to write MERGE_MSG")?;

        Ok(())
    }

    /// Incoming commit of an unresolved merge
    pub fn merge_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let path = self.path.join(MERGE_HEAD_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).context("failed to read MERGE_HEAD")?;
        Ok(Some(
            ObjectId::try_parse(content.trim().to_string()).context("MERGE_HEAD is corrupt")?,
        ))
    }

    pub fn merge_message(&self) -> anyhow::Result<Option<String>> {
        let path = self.path.join(MERGE_MSG_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        Ok(Some(
            std::fs::read_to_string(&path).context("failed to read MERGE_MSG")?,
        ))
    }

    pub fn clear_merge_state(&self) -> anyhow::Result<()> {
        for file in [MERGE_HEAD_FILE, MERGE_MSG_FILE] {
            let path = self.path.join(file);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {path:?}"))?;
            }
        }

        Ok(())
    }

    /// Write `<value>\n` to a ref file, creating parent directories
    fn update_ref_file(&self, path: &Path, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        std::fs::write(path, format!("{value}\n"))
            .with_context(|| format!("failed to write ref file at {path:?}"))
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.path.join(name.to_ref_path()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_FILE).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
