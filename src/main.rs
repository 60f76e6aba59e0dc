use anyhow::Result;
use clap::{Parser, Subcommand};
use mygit::Repository;
use mygit::areas::repository::DEFAULT_METADATA_DIR;
use mygit::artifacts::merge::MergeOutcome;
use mygit::commands::porcelain::{DiffOptions, LogOptions, StatusOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mygit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal content-addressed version-control engine",
    long_about = "Tracks snapshots of a directory tree in a local object database, \
    with branches, fast-forward and three-way merges, and unified diffs.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    /// Name of the metadata directory inside the working tree
    #[arg(long, global = true, env = "MYGIT_DIR", default_value = DEFAULT_METADATA_DIR)]
    git_dir_name: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Creates the metadata directory in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage files and directories for the next commit")]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "Paths to stage")]
        paths: Vec<String>,
    },
    #[command(name = "status", about = "Show staged, unstaged and untracked changes")]
    Status {
        #[arg(long, help = "Two-column XY output")]
        porcelain: bool,
    },
    #[command(name = "commit", about = "Record the staged snapshot as a new commit")]
    Commit {
        #[arg(short, long, default_value = "", help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the first-parent history of HEAD")]
    Log {
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(
        name = "branch",
        about = "List branches, or create one",
        long_about = "Without arguments lists all branches. With a name, creates a branch \
        at the given start point or at the current commit."
    )]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, help = "Revision to start the branch at")]
        start_point: Option<String>,
    },
    #[command(name = "checkout", about = "Switch to a branch")]
    Checkout {
        #[arg(short = 'b', help = "Create the branch at HEAD before switching")]
        create: bool,
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "diff",
        about = "Show changes between commits, the index and the working tree"
    )]
    Diff {
        #[arg(long, visible_alias = "cached", help = "Compare against the index")]
        staged: bool,
        #[arg(index = 1, num_args = 0..=2)]
        commits: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("MYGIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let pwd = std::env::current_dir()?;
    let stdout = || Box::new(std::io::stdout()) as Box<dyn std::io::Write>;

    if let Commands::Init { path } = &cli.command {
        let path = path.clone().unwrap_or(pwd);
        let mut repository = Repository::new(&path, &cli.git_dir_name, stdout())?;
        repository.init().await?;

        return Ok(ExitCode::SUCCESS);
    }

    let mut repository = Repository::open(&pwd, &cli.git_dir_name, stdout())?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Add { paths } => {
            let summary = repository.add(&paths).await?;
            if !summary.errors.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Status { porcelain } => {
            repository.status(StatusOptions { porcelain }).await?;
        }
        Commands::Commit { message } => {
            repository.commit(&message).await?;
        }
        Commands::Log { oneline } => {
            repository.log(&LogOptions { oneline }).await?;
        }
        Commands::Branch { name, start_point } => match name {
            Some(name) => {
                repository
                    .create_branch(&name, start_point.as_deref())
                    .await?;
            }
            None => {
                repository.list_branches().await?;
            }
        },
        Commands::Checkout { create, name } => repository.checkout(&name, create).await?,
        Commands::Merge { branch } => {
            if let MergeOutcome::Conflicted { .. } = repository.merge(&branch).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Diff { staged, commits } => {
            repository.diff(&DiffOptions { staged, commits }).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
