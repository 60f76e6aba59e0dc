//! Repository context
//!
//! Bundles the areas of one repository (object database, index, refs and
//! working tree) together with the output sink of the porcelain commands.
//! Nothing depends on the process working directory, so several repositories
//! can be driven from one process.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::database::FlatTree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::Status;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default name of the metadata directory
pub const DEFAULT_METADATA_DIR: &str = ".mygit";
pub const INDEX_FILE: &str = "index.json";
pub const OBJECTS_DIR: &str = "objects";

pub struct Repository {
    path: Box<Path>,
    metadata_dir_name: String,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Context for the repository rooted at `path`, creating the root if needed
    ///
    /// The metadata directory is not required to exist; `init` creates it.
    pub fn new(
        path: &Path,
        metadata_dir_name: &str,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()))?;
        let metadata_path = path.join(metadata_dir_name);

        let index = Index::new(metadata_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(metadata_path.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path(), metadata_dir_name.to_string());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            metadata_dir_name: metadata_dir_name.to_string(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    /// Context for an existing repository
    pub fn open(
        path: &Path,
        metadata_dir_name: &str,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let repository = Self::new(path, metadata_dir_name, writer)?;

        if !repository.is_initialized() {
            return Err(RepositoryError::NotARepository {
                dir: repository.metadata_path().display().to_string(),
            }
            .into());
        }

        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_dir_name(&self) -> &str {
        &self.metadata_dir_name
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(&self.metadata_dir_name)
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn status_scanner(&'_ self) -> Status<'_> {
        Status::new(self)
    }

    /// Flattened tree of the HEAD commit, empty on an unborn branch
    pub fn head_tree(&self) -> anyhow::Result<FlatTree> {
        match self.refs.read_head()? {
            Some(head_oid) => self.database.read_commit_tree(&head_oid),
            None => Ok(FlatTree::new()),
        }
    }

    /// Resolve a revision (`HEAD`, branch, object ID prefix, `rev^`, `rev~n`) to a commit
    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<ObjectId> {
        Revision::try_parse(revision)?.resolve(self)
    }
}
