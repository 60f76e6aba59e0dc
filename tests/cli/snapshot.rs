use crate::common::command::{
    add_and_commit, init_repository_dir, mygit_commit, repository_dir, run_mygit_command,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn add_reports_staged_files(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let files = write_generated_files(repository_dir.path(), 3);

    let mut assert = run_mygit_command(repository_dir.path(), &["add", "."]).assert().success();
    for file in files {
        let name = file.path.file_name().unwrap().to_string_lossy().to_string();
        assert = assert.stdout(predicate::str::contains(format!(
            "Added {name} to staging area."
        )));
    }
}

#[rstest]
fn add_of_a_missing_path_fails(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_mygit_command(repository_dir.path(), &["add", "nope.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "error: nope.txt: pathspec 'nope.txt' did not match any files",
        ));
}

#[rstest]
fn commit_prints_a_summary_line(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "hello\n".to_string(),
    ));
    run_mygit_command(repository_dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    mygit_commit(repository_dir.path(), "Say hello")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[main \(root-commit\) [0-9a-f]{7}\] Say hello\n$").unwrap());
}

#[rstest]
fn commit_without_changes_fails(init_repository_dir: TempDir) {
    mygit_commit(init_repository_dir.path(), "again")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn status_porcelain_lists_changes(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "one, edited\n".to_string()));
    write_file(FileSpec::new(dir.join("c/new.txt"), "new\n".to_string()));

    run_mygit_command(dir, &["status", "--porcelain"])
        .assert()
        .success()
        .stdout(" M 1.txt\n?? c/\n");
}

#[rstest]
fn log_shows_the_author_from_the_environment(init_repository_dir: TempDir) {
    run_mygit_command(init_repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Author: fake_user <fake_email@email.com>",
        ))
        .stdout(predicate::str::contains("    Initial commit"))
        .stdout(predicate::str::ends_with("Total commits: 1\n"));
}

#[rstest]
fn log_oneline_lists_history(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "one\nmore\n".to_string()));
    let second = add_and_commit(dir, "Second commit");

    run_mygit_command(dir, &["log", "--oneline"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("{second} Second commit\n")))
        .stdout(predicate::str::contains("Initial commit\nTotal commits: 2\n"));
}

#[rstest]
fn diff_shows_unstaged_edits(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a/2.txt"), "two\nplus\n".to_string()));

    run_mygit_command(dir, &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "diff --git a/a/2.txt b/a/2.txt\n--- a/a/2.txt\n+++ b/a/2.txt\n",
        ))
        .stdout(predicate::str::contains("+plus\n"));

    run_mygit_command(dir, &["diff", "--cached"])
        .assert()
        .success()
        .stdout("");
}
