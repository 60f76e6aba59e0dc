use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// One `<short-id> <subject>` line per commit
    pub oneline: bool,
}

impl Repository {
    /// Print the first-parent history of HEAD, newest first
    ///
    /// Returns the number of commits shown. An unreadable commit ends the
    /// listing with an error line instead of failing the command.
    pub async fn log(&mut self, options: &LogOptions) -> anyhow::Result<usize> {
        let Some(head_oid) = self.refs().read_head()? else {
            writeln!(self.writer(), "{}", "No commits yet".yellow())?;
            return Ok(0);
        };

        let mut commit_count = 0;
        for item in RevList::new(self.database(), Some(head_oid)) {
            match item {
                Ok((oid, commit)) => {
                    if options.oneline {
                        self.show_commit_oneline(&oid, &commit)?;
                    } else {
                        self.show_commit_medium(&oid, &commit)?;
                    }
                    commit_count += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "history walk stopped");
                    writeln!(self.writer(), "{} {err}", "error:".red())?;
                }
            }
        }

        writeln!(self.writer(), "Total commits: {commit_count}")?;

        Ok(commit_count)
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "{}", format!("commit {oid}").yellow())?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "Merge: {parents}")?;
        }
        writeln!(writer, "Author: {}", commit.author().display_name())?;
        writeln!(writer, "Date:   {}", commit.author().readable_timestamp())?;
        writeln!(writer)?;
        for message_line in commit.message().lines() {
            writeln!(writer, "    {message_line}")?;
        }
        writeln!(writer)?;

        Ok(())
    }

    fn show_commit_oneline(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            oid.to_short_oid().yellow(),
            commit.short_message()
        )?;

        Ok(())
    }
}
