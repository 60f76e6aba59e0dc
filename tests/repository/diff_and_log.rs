use crate::common::repository::init_repository;
use mygit::commands::porcelain::{DiffOptions, LogOptions};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn unstaged_diff_compares_index_and_working_tree() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n"), ("b.txt", "same\n")], "initial")
        .await;
    repo.write("a.txt", "one\ntwo\n");

    repo.repository.diff(&DiffOptions::default()).await.unwrap();

    let output = repo.output.take();
    assert!(output.starts_with("diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n"));
    assert!(output.contains("\n one\n+two\n"));
    assert!(!output.contains("b.txt"));
}

#[tokio::test]
async fn staged_diff_compares_head_and_index() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "initial").await;
    repo.write("new.txt", "fresh\n");
    repo.add_all().await;
    repo.write("new.txt", "fresh\nbut unstaged\n");
    repo.output.take();

    repo.repository
        .diff(&DiffOptions {
            staged: true,
            commits: vec![],
        })
        .await
        .unwrap();

    let output = repo.output.take();
    assert!(output.contains("--- /dev/null\n+++ b/new.txt\n"));
    assert!(output.contains("+fresh\n"));
    assert!(!output.contains("but unstaged"));
}

#[tokio::test]
async fn diff_between_two_commits() {
    let mut repo = init_repository().await;
    let first = repo
        .commit_files(&[("a.txt", "one\n"), ("gone.txt", "bye\n")], "first")
        .await;
    repo.remove("gone.txt");
    let second = repo.commit_files(&[("a.txt", "uno\n")], "second").await;

    repo.repository
        .diff(&DiffOptions {
            staged: false,
            commits: vec![first.to_string(), second.to_string()],
        })
        .await
        .unwrap();

    let output = repo.output.take();
    assert!(output.contains("-one\n+uno\n"));
    assert!(output.contains("--- a/gone.txt\n+++ /dev/null\n"));
    assert!(output.contains("\n-bye\n"));
}

#[tokio::test]
async fn diff_of_a_commit_against_the_working_tree() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "first").await;
    repo.commit_files(&[("a.txt", "one\ntwo\n")], "second").await;
    repo.write("a.txt", "one\ntwo\nthree\n");

    repo.repository
        .diff(&DiffOptions {
            staged: false,
            commits: vec!["HEAD^".to_string()],
        })
        .await
        .unwrap();

    let output = repo.output.take();
    assert!(output.contains("+two\n+three\n"));
}

#[tokio::test]
async fn diff_rejects_more_than_two_revisions() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "first").await;

    let result = repo
        .repository
        .diff(&DiffOptions {
            staged: false,
            commits: vec!["HEAD".to_string(); 3],
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn log_walks_first_parents_newest_first() {
    let mut repo = init_repository().await;
    let first = repo.commit_files(&[("a.txt", "one\n")], "first").await;
    let second = repo.commit_files(&[("a.txt", "one\ntwo\n")], "second").await;

    let count = repo
        .repository
        .log(&LogOptions { oneline: true })
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        repo.output.take(),
        format!(
            "{} second\n{} first\nTotal commits: 2\n",
            second.to_short_oid(),
            first.to_short_oid()
        )
    );
}

#[tokio::test]
async fn log_medium_format_shows_author_and_message() {
    let mut repo = init_repository().await;
    let oid = repo
        .commit_files(&[("a.txt", "one\n")], "subject line\n\nbody text")
        .await;

    repo.repository
        .log(&LogOptions::default())
        .await
        .unwrap();

    let output = repo.output.take();
    assert!(output.starts_with(&format!("commit {oid}\nAuthor: ")));
    assert!(output.contains("\nDate:   "));
    assert!(output.contains("\n    subject line\n    \n    body text\n"));
    assert!(output.ends_with("Total commits: 1\n"));
}

#[tokio::test]
async fn log_on_an_unborn_branch() {
    let mut repo = init_repository().await;

    let count = repo
        .repository
        .log(&LogOptions::default())
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert_eq!(repo.output.take(), "No commits yet\n");
}
