use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;

const CONFIG: &str = "[core]
\trepositoryformatversion = 0
\tfilemode = true
\tbare = false
\tlogallrefupdates = true
";

const DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const EXCLUDE: &str = "# exclude patterns (uncomment them if you want to use them):
# *.[oa]
# *~
";

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let metadata_path = self.metadata_path();

        if self.refs().head_path().exists() {
            writeln!(
                self.writer(),
                "Repository already initialized in {}",
                metadata_path.display()
            )?;
            return Ok(());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;
        fs::create_dir_all(self.refs().refs_path().join("tags"))
            .context("Failed to create refs/tags directory")?;
        fs::create_dir_all(metadata_path.join("info")).context("Failed to create info directory")?;

        fs::write(metadata_path.join("config"), CONFIG).context("Failed to write config")?;
        fs::write(metadata_path.join("description"), DESCRIPTION)
            .context("Failed to write description")?;
        fs::write(metadata_path.join("info").join("exclude"), EXCLUDE)
            .context("Failed to write info/exclude")?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs()
            .set_head_branch(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        {
            let index = self.index();
            let mut index = index.lock().await;
            index.clear();
            index.write_updates().context("Failed to create the index file")?;
        }

        tracing::info!(path = %metadata_path.display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            metadata_path.display()
        )?;

        Ok(())
    }
}
