use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::index_entry::{EntryMetadata, to_entry_name};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never reported as part of the working tree
const ALWAYS_IGNORED: [&str; 1] = [".git"];

/// Working tree rooted at the repository root
///
/// Files are addressed by their `/`-separated path relative to the root, the
/// same names used as index keys.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
    /// Name of the metadata directory, skipped while walking
    metadata_dir_name: String,
}

impl Workspace {
    pub fn new(path: Box<Path>, metadata_dir_name: String) -> Self {
        Workspace {
            path,
            metadata_dir_name,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn is_ignored(&self, relative_path: &Path) -> bool {
        relative_path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name = name.to_string_lossy();
                name == self.metadata_dir_name || ALWAYS_IGNORED.contains(&name.as_ref())
            } else {
                false
            }
        })
    }

    /// Convert a user-supplied path (absolute or relative to the root) into an entry name
    pub fn entry_name(&self, path: &Path) -> anyhow::Result<String> {
        let relative_path = if path.is_absolute() {
            path.strip_prefix(self.path.as_ref())
                .with_context(|| format!("{} is outside the repository", path.display()))?
        } else {
            path
        };

        to_entry_name(relative_path)
            .with_context(|| format!("{} is outside the repository", path.display()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.full_path(name).exists()
    }

    pub fn is_dir(&self, name: &str) -> bool {
        self.full_path(name).is_dir()
    }

    pub fn is_file(&self, name: &str) -> bool {
        self.full_path(name).is_file()
    }

    /// List files below `root` (the whole working tree for `None` or `""`),
    /// sorted by name
    ///
    /// A `root` naming a file yields just that file.
    pub fn list_files(&self, root: Option<&str>) -> anyhow::Result<Vec<String>> {
        let root = root.filter(|root| !root.is_empty());
        let root_path = match root {
            Some(root) => self.full_path(root),
            None => self.path.to_path_buf(),
        };

        if !root_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", root_path);
        }

        if root_path.is_file() {
            return Ok(root.map(str::to_string).into_iter().collect());
        }

        let mut files = WalkDir::new(&root_path)
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .map(|relative_path| !self.is_ignored(relative_path))
                    .unwrap_or(false)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                to_entry_name(relative_path)
            })
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    /// File content, `None` if no file exists at `name`
    pub fn read_file(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        let file_path = self.full_path(name);
        if !file_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {name}"))?;

        Ok(Some(Bytes::from(content)))
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Option<Blob>> {
        Ok(self.read_file(name)?.map(Blob::new))
    }

    /// Size and modification time, `None` if no file exists at `name`
    pub fn stat_file(&self, name: &str) -> anyhow::Result<Option<EntryMetadata>> {
        let file_path = self.full_path(name);
        if !file_path.is_file() {
            return Ok(None);
        }

        let metadata = std::fs::metadata(&file_path)
            .with_context(|| format!("Failed to get metadata for file: {name}"))?;

        Ok(Some(EntryMetadata::try_from(&metadata)?))
    }

    /// Write a file, creating parent directories and replacing whatever is in the way
    pub fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()> {
        let file_path = self.full_path(name);

        for ancestor in crate::artifacts::index::index_entry::parent_dirs(name) {
            let ancestor_path = self.full_path(&ancestor);
            if ancestor_path.is_file() {
                std::fs::remove_file(&ancestor_path)
                    .with_context(|| format!("Failed to remove file: {ancestor}"))?;
            }
        }
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for: {name}"))?;
        }
        if file_path.is_dir() {
            std::fs::remove_dir_all(&file_path)
                .with_context(|| format!("Failed to remove existing directory: {name}"))?;
        }

        std::fs::write(&file_path, data).with_context(|| format!("Failed to write file: {name}"))
    }

    /// Remove a file if present and prune directories left empty
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.full_path(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {name}"))?;
        }
        self.prune_empty_parent_dirs(&file_path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Failed to remove empty directory at {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    /// Apply a checkout migration: deletions first, then writes
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for name in migration.deletions() {
            self.remove_file(name)?;
        }

        for (name, entry) in migration.writes() {
            let data = migration.load_blob_data(&entry.oid)?;
            self.write_file(name, &data)?;
        }

        Ok(())
    }
}
