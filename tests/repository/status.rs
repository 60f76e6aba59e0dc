use crate::common::repository::init_repository;
use mygit::artifacts::status::file_change::{FileChangeType, IndexChangeType, WorkspaceChangeType};
use mygit::commands::porcelain::StatusOptions;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[tokio::test]
async fn clean_tree_reports_nothing_to_commit() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "initial").await;

    let status = repo
        .repository
        .status(StatusOptions::default())
        .await
        .unwrap();

    assert!(status.is_clean());
    assert_eq!(
        repo.output.take(),
        "On branch main\n\nnothing to commit, working tree clean\n"
    );
}

#[tokio::test]
async fn untracked_directories_are_collapsed() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "initial").await;
    repo.write("new.txt", "new\n");
    repo.write("fresh/nested/deep.txt", "deep\n");

    let status = repo
        .repository
        .status(StatusOptions { porcelain: true })
        .await
        .unwrap();

    assert_eq!(
        status.untracked_files().iter().cloned().collect::<Vec<_>>(),
        vec!["fresh/", "new.txt"]
    );
    assert_eq!(repo.output.take(), "?? fresh/\n?? new.txt\n");
}

#[tokio::test]
async fn staged_and_unstaged_changes_are_separated() {
    let mut repo = init_repository().await;
    repo.commit_files(
        &[("modified.txt", "one\n"), ("deleted.txt", "gone\n"), ("staged.txt", "s\n")],
        "initial",
    )
    .await;

    repo.write("staged.txt", "staged change\n");
    repo.write("added.txt", "added\n");
    repo.repository
        .add(&["staged.txt".to_string(), "added.txt".to_string()])
        .await
        .unwrap();
    repo.write("modified.txt", "one\nand more\n");
    repo.remove("deleted.txt");
    repo.output.take();

    let status = repo
        .repository
        .status(StatusOptions { porcelain: true })
        .await
        .unwrap();

    let expected_index = BTreeMap::from([
        (
            "added.txt".to_string(),
            FileChangeType::Index(IndexChangeType::Added),
        ),
        (
            "staged.txt".to_string(),
            FileChangeType::Index(IndexChangeType::Modified),
        ),
    ]);
    let expected_workspace = BTreeMap::from([
        (
            "deleted.txt".to_string(),
            FileChangeType::Workspace(WorkspaceChangeType::Deleted),
        ),
        (
            "modified.txt".to_string(),
            FileChangeType::Workspace(WorkspaceChangeType::Modified),
        ),
    ]);
    assert_eq!(status.index_changeset(), expected_index);
    assert_eq!(status.workspace_changeset(), expected_workspace);
    assert_eq!(
        repo.output.take(),
        "A  added.txt\n D deleted.txt\n M modified.txt\nM  staged.txt\n"
    );
}

#[tokio::test]
async fn long_format_lists_sections() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "initial").await;
    repo.write("a.txt", "one\ntwo\n");
    repo.write("b.txt", "b\n");

    repo.repository
        .status(StatusOptions::default())
        .await
        .unwrap();

    let output = repo.output.take();
    assert!(output.contains("Changes not staged for commit:\n        modified:   a.txt\n"));
    assert!(output.contains("Untracked files:\n        b.txt\n"));
    assert!(output.ends_with("no changes added to commit\n"));
}

#[tokio::test]
async fn unborn_branch_shows_every_file_as_untracked() {
    let mut repo = init_repository().await;
    repo.write("a.txt", "one\n");

    let status = repo
        .repository
        .status(StatusOptions { porcelain: true })
        .await
        .unwrap();

    assert!(status.changed_files().is_empty());
    assert!(status.untracked_files().contains("a.txt"));
}
