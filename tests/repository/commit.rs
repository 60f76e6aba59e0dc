use crate::common::repository::{init_repository, repository_error};
use mygit::RepositoryError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn first_commit_is_a_root_commit_on_main() {
    let mut repo = init_repository().await;
    repo.write("hello.txt", "hello\n");
    repo.add_all().await;
    repo.output.take();

    let oid = repo.repository.commit("Initial commit").await.unwrap();

    let commit = repo.repository.database().load_commit(&oid).unwrap();
    assert!(commit.parents().is_empty());
    assert_eq!(commit.message(), "Initial commit");
    assert_eq!(
        repo.output.take(),
        format!("[main (root-commit) {}] Initial commit\n", oid.to_short_oid())
    );
    assert_eq!(repo.head_oid(), Some(oid));
}

#[tokio::test]
async fn commits_chain_through_their_parent() {
    let mut repo = init_repository().await;
    let first = repo.commit_files(&[("a.txt", "one\n")], "first").await;
    let second = repo.commit_files(&[("a.txt", "one\ntwo\n")], "second").await;

    let commit = repo.repository.database().load_commit(&second).unwrap();
    assert_eq!(commit.parents(), &[first]);

    let tree = repo.repository.database().read_commit_tree(&second).unwrap();
    let blob = repo
        .repository
        .database()
        .load_blob(&tree["a.txt"].oid)
        .unwrap();
    assert_eq!(blob.text(), "one\ntwo\n");
}

#[tokio::test]
async fn nested_directories_become_subtrees() {
    let mut repo = init_repository().await;
    let oid = repo
        .commit_files(
            &[("1.txt", "one\n"), ("a/2.txt", "two\n"), ("a/b/3.txt", "three\n")],
            "nested",
        )
        .await;

    let tree = repo.repository.database().read_commit_tree(&oid).unwrap();
    assert_eq!(
        tree.keys().cloned().collect::<Vec<_>>(),
        vec!["1.txt", "a/2.txt", "a/b/3.txt"]
    );
}

#[tokio::test]
async fn committing_an_empty_index_fails() {
    let mut repo = init_repository().await;

    let error = repo.repository.commit("nothing").await.unwrap_err();

    assert!(matches!(
        repository_error(&error),
        RepositoryError::NothingToCommit { .. }
    ));
    assert_eq!(repo.head_oid(), None);
}

#[tokio::test]
async fn committing_the_same_tree_twice_fails() {
    let mut repo = init_repository().await;
    let first = repo.commit_files(&[("a.txt", "one\n")], "first").await;

    let error = repo.repository.commit("again").await.unwrap_err();

    assert!(matches!(
        repository_error(&error),
        RepositoryError::NothingToCommit { .. }
    ));
    assert_eq!(repo.head_oid(), Some(first));
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let mut repo = init_repository().await;
    repo.write("a.txt", "one\n");
    repo.add_all().await;

    assert!(repo.repository.commit("   ").await.is_err());
    assert_eq!(repo.head_oid(), None);
}
