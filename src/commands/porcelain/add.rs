use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

/// What one `add` run did to the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSummary {
    /// Files whose new content was staged
    pub staged: Vec<String>,
    /// Tracked files dropped from the index because they are gone from disk
    pub removed: Vec<String>,
    /// Paths that could not be staged, with the reason
    pub errors: Vec<(String, String)>,
}

impl Repository {
    /// Stage files and directories (`.` for the whole working tree)
    ///
    /// Failures are collected per path; the index is still written for every
    /// path that succeeded.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<AddSummary> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let mut summary = AddSummary::default();
        for path in paths {
            if let Err(err) = self.add_path(path, &mut index, &mut summary) {
                tracing::warn!(path, error = %err, "failed to add path");
                summary.errors.push((path.clone(), format!("{err:#}")));
            }
        }

        index.write_updates()?;
        self.report_add(&summary)?;

        Ok(summary)
    }

    fn add_path(
        &self,
        path: &str,
        index: &mut Index,
        summary: &mut AddSummary,
    ) -> anyhow::Result<()> {
        let name = self.workspace().entry_name(Path::new(path))?;

        if !name.is_empty() && !self.workspace().exists(&name) {
            if !index.is_directly_tracked(&name) {
                anyhow::bail!("pathspec '{path}' did not match any files");
            }
            let removed = self.tracked_below(index, &name);
            index.remove(&name);
            summary.removed.extend(removed);
            return Ok(());
        }

        let files = self.workspace().list_files(Some(&name))?;
        let present = files.iter().collect::<BTreeSet<_>>();

        for gone in self
            .tracked_below(index, &name)
            .into_iter()
            .filter(|tracked| !present.contains(tracked))
        {
            index.remove(&gone);
            summary.removed.push(gone);
        }

        for file in files {
            match self.add_file(&file, index) {
                Ok(true) => summary.staged.push(file),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(file, error = %err, "failed to stage file");
                    summary.errors.push((file, format!("{err:#}")));
                }
            }
        }

        Ok(())
    }

    /// Stage one file; `false` when the index already holds this content
    fn add_file(&self, file: &str, index: &mut Index) -> anyhow::Result<bool> {
        let blob = self
            .workspace()
            .parse_blob(file)?
            .with_context(|| format!("{file} vanished while staging"))?;
        let stat = self
            .workspace()
            .stat_file(file)?
            .with_context(|| format!("{file} vanished while staging"))?;
        let blob_id = blob.object_id()?;

        if index
            .entry_by_path(file)
            .is_some_and(|entry| entry.oid == blob_id)
        {
            index.update_entry_stat(file, stat);
            return Ok(false);
        }

        self.database().store(&blob)?;
        index.add(IndexEntry::new(file.to_string(), blob_id, stat));

        Ok(true)
    }

    /// Tracked files at `name` or below it (everything for the root)
    fn tracked_below(&self, index: &Index, name: &str) -> Vec<String> {
        index
            .entries()
            .filter(|entry| {
                name.is_empty()
                    || entry.name == name
                    || entry
                        .name
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn report_add(&self, summary: &AddSummary) -> anyhow::Result<()> {
        let mut writer = self.writer();

        for file in &summary.staged {
            writeln!(writer, "{}", format!("Added {file} to staging area.").green())?;
        }
        for file in &summary.removed {
            writeln!(
                writer,
                "{}",
                format!("Removed {file} from staging area (deleted).").yellow()
            )?;
        }
        for (path, reason) in &summary.errors {
            writeln!(writer, "{} {path}: {reason}", "error:".red())?;
        }

        Ok(())
    }
}
