use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit on `main` holding `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\n".to_string(),
    ));

    run_mygit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    mygit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_mygit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("mygit").expect("Failed to find mygit binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("MYGIT_DIR");
    cmd.current_dir(dir);
    cmd.args(args);
    cmd
}

pub fn mygit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_mygit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GIT_AUTHOR_NAME", "fake_user"),
        ("GIT_AUTHOR_EMAIL", "fake_email@email.com"),
        ("GIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Stage everything and commit it, returning the new commit ID from the summary line
pub fn add_and_commit(dir: &Path, message: &str) -> String {
    run_mygit_command(dir, &["add", "."]).assert().success();
    let output = mygit_commit(dir, message).output().expect("commit to run");
    assert!(output.status.success(), "commit failed: {output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split(']')
        .next()
        .and_then(|summary| summary.split_whitespace().last())
        .map(str::to_string)
        .expect("commit summary line")
}
