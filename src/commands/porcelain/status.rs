use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::{ChangeSet, StatusInfo};
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOptions {
    /// Two-column `XY path` lines instead of the long format
    pub porcelain: bool,
}

impl Repository {
    pub async fn status(&mut self, options: StatusOptions) -> anyhow::Result<StatusInfo> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;
        let status_info = self.status_scanner().initialize(&mut index)?;
        if index.has_changed() {
            index.write_updates()?;
        }

        if options.porcelain {
            self.print_porcelain_format(&status_info)?;
        } else {
            self.print_long_format(&status_info)?;
        }

        Ok(status_info)
    }

    fn print_porcelain_format(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let mut writer = self.writer();

        for (file, change) in status_info.changed_files() {
            writeln!(writer, "{change} {file}")?;
        }
        for file in status_info.untracked_files() {
            writeln!(writer, "?? {file}")?;
        }

        Ok(())
    }

    fn print_long_format(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let mut writer = self.writer();

        match status_info.head() {
            Head::Branch(name) => writeln!(writer, "On branch {name}")?,
            Head::Detached(oid) => writeln!(
                writer,
                "{}",
                format!("HEAD detached at {}", oid.to_short_oid()).red()
            )?,
        }
        if status_info.merge_in_progress() {
            writeln!(writer, "You have unmerged paths.")?;
            writeln!(writer, "  (fix conflicts and run \"commit\")")?;
        }
        writeln!(writer)?;

        print_changeset(
            &mut *writer,
            "Changes to be committed:",
            &status_info.index_changeset(),
        )?;
        print_changeset(
            &mut *writer,
            "Changes not staged for commit:",
            &status_info.workspace_changeset(),
        )?;
        print_changeset(
            &mut *writer,
            "Untracked files:",
            &status_info.untracked_changeset(),
        )?;

        if status_info.is_clean() {
            writeln!(writer, "nothing to commit, working tree clean")?;
        } else if status_info.index_changeset().is_empty() {
            writeln!(writer, "no changes added to commit")?;
        }

        Ok(())
    }
}

fn print_changeset(
    writer: &mut impl Write,
    title: &str,
    changeset: &ChangeSet,
) -> anyhow::Result<()> {
    if changeset.is_empty() {
        return Ok(());
    }

    writeln!(writer, "{title}")?;
    for (file, change) in changeset {
        writeln!(writer, "{}", FileChangeType::format_line(change, file))?;
    }
    writeln!(writer)?;

    Ok(())
}
