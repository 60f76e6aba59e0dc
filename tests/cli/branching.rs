use crate::common::command::{add_and_commit, init_repository_dir, run_mygit_command};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn branch_lists_and_creates(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_mygit_command(dir, &["branch", "feature"])
        .assert()
        .success();

    run_mygit_command(dir, &["branch"])
        .assert()
        .success()
        .stdout("  feature\n* main\n");
}

#[rstest]
fn branch_rejects_invalid_names(init_repository_dir: TempDir) {
    run_mygit_command(init_repository_dir.path(), &["branch", "-bad"])
        .assert()
        .failure();

    run_mygit_command(init_repository_dir.path(), &["branch", "bad.lock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid branch name"));
}

#[rstest]
fn checkout_switches_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_mygit_command(dir, &["checkout", "-b", "feature"])
        .assert()
        .success()
        .stdout("Switched to a new branch 'feature'\n");
    write_file(FileSpec::new(dir.join("1.txt"), "one on feature\n".to_string()));
    add_and_commit(dir, "Feature commit");

    run_mygit_command(dir, &["checkout", "main"])
        .assert()
        .success()
        .stdout("Switched to branch 'main'\n");
    assert_eq!(read_file(&dir.join("1.txt")), "one\n");
}

#[rstest]
fn merge_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_mygit_command(dir, &["checkout", "-b", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("4.txt"), "four\n".to_string()));
    add_and_commit(dir, "Add four");
    run_mygit_command(dir, &["checkout", "main"])
        .assert()
        .success();

    run_mygit_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Fast-forward\n"));
    assert_eq!(read_file(&dir.join("4.txt")), "four\n");
}

#[rstest]
fn merge_conflict_exits_with_failure(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_mygit_command(dir, &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("1.txt"), "one from main\n".to_string()));
    add_and_commit(dir, "Main edit");

    run_mygit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("1.txt"), "one from feature\n".to_string()));
    add_and_commit(dir, "Feature edit");
    run_mygit_command(dir, &["checkout", "main"])
        .assert()
        .success();

    run_mygit_command(dir, &["merge", "feature"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "CONFLICT (both modified): Merge conflict in 1.txt",
        ));
    assert_eq!(
        read_file(&dir.join("1.txt")),
        "<<<<<<< HEAD\none from main\n=======\none from feature\n>>>>>>> incoming\n"
    );

    run_mygit_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You have unmerged paths."));

    write_file(FileSpec::new(dir.join("1.txt"), "one, resolved\n".to_string()));
    add_and_commit(dir, "");
    run_mygit_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge: "))
        .stdout(predicate::str::contains("Merge branch 'feature' into main"));
}
