use crate::common::command::{repository_dir, run_mygit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_creates_the_metadata_directory(repository_dir: TempDir) {
    let metadata_dir = repository_dir.path().canonicalize().unwrap().join(".mygit");

    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "Initialized empty repository in {}\n",
            metadata_dir.display()
        )));

    assert!(metadata_dir.join("objects").is_dir());
    assert!(metadata_dir.join("refs").join("heads").is_dir());
    assert_eq!(
        std::fs::read_to_string(metadata_dir.join("HEAD")).unwrap(),
        "ref: refs/heads/main\n"
    );
    assert_eq!(
        std::fs::read_to_string(metadata_dir.join("index.json")).unwrap(),
        "{}"
    );
}

#[rstest]
fn init_twice_leaves_the_repository_alone(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Repository already initialized in"));
}

#[rstest]
fn init_at_a_path_creates_it(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["init", "nested/project"])
        .assert()
        .success();

    assert!(repository_dir.path().join("nested/project/.mygit/HEAD").is_file());
}

#[rstest]
fn metadata_directory_name_is_configurable(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["--git-dir-name", ".vcs", "init"])
        .assert()
        .success();

    assert!(repository_dir.path().join(".vcs/HEAD").is_file());
    assert!(!repository_dir.path().join(".mygit").exists());
}

#[rstest]
fn commands_outside_a_repository_fail(repository_dir: TempDir) {
    run_mygit_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a repository"));
}
