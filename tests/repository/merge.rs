use crate::common::repository::{TestRepository, init_repository, repository_error};
use mygit::RepositoryError;
use mygit::artifacts::branch::branch_name::BranchName;
use mygit::artifacts::merge::MergeOutcome;
use mygit::artifacts::objects::commit::{Author, Commit};
use mygit::artifacts::objects::object_id::ObjectId;
use mygit::commands::porcelain::StatusOptions;
use pretty_assertions::assert_eq;

/// Diverged history on `main` and `feature`
///
/// ```text
///       A
///      / \
///     B   C
///     |   |
///   main  feature
/// ```
///
/// Returns the repository checked out on `main` with the IDs of B and C.
async fn diverged(
    base: &[(&str, &str)],
    ours: &[(&str, &str)],
    theirs: &[(&str, &str)],
    deleted_by_them: &[&str],
) -> (TestRepository, ObjectId, ObjectId) {
    let mut repo = init_repository().await;
    repo.commit_files(base, "A").await;
    repo.branch("feature").await;

    let ours_oid = repo.commit_files(ours, "B").await;

    repo.checkout("feature").await;
    for name in deleted_by_them {
        repo.remove(name);
    }
    let theirs_oid = repo.commit_files(theirs, "C").await;
    repo.checkout("main").await;

    (repo, ours_oid, theirs_oid)
}

async fn index_tracks(repo: &TestRepository, name: &str) -> bool {
    let index = repo.repository.index();
    let mut index = index.lock().await;
    index.rehydrate().unwrap();
    index.entry_by_path(name).is_some()
}

#[tokio::test]
async fn merging_a_branch_ahead_fast_forwards() {
    let mut repo = init_repository().await;
    let base = repo
        .commit_files(&[("a.txt", "base\n"), ("gone.txt", "soon removed\n")], "A")
        .await;
    repo.branch("feature").await;
    repo.checkout("feature").await;
    repo.remove("gone.txt");
    let ahead = repo
        .commit_files(&[("a.txt", "base\nfeature\n"), ("new/file.txt", "new\n")], "B")
        .await;
    repo.checkout("main").await;

    let outcome = repo.repository.merge("feature").await.unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::FastForward {
            from: base.clone(),
            to: ahead.clone()
        }
    );
    assert_eq!(
        repo.output.take(),
        format!(
            "Updating {}..{}\nFast-forward\n",
            base.to_short_oid(),
            ahead.to_short_oid()
        )
    );
    assert_eq!(repo.head_oid(), Some(ahead));
    assert_eq!(repo.read("a.txt"), "base\nfeature\n");
    assert_eq!(repo.read("new/file.txt"), "new\n");
    assert!(!repo.exists("gone.txt"));
    assert!(!index_tracks(&repo, "gone.txt").await);

    let status = repo
        .repository
        .status(StatusOptions { porcelain: true })
        .await
        .unwrap();
    assert!(status.is_clean());
}

#[tokio::test]
async fn clean_three_way_merge_creates_a_merge_commit() {
    let (mut repo, ours, theirs) = diverged(
        &[
            ("base.txt", "base\n"),
            ("left.txt", "initial\n"),
            ("right.txt", "initial\n"),
            ("obsolete.txt", "old\n"),
        ],
        &[("left.txt", "initial\nmain change\n")],
        &[("right.txt", "initial\nfeature change\n"), ("added.txt", "added\n")],
        &["obsolete.txt"],
    )
    .await;

    let outcome = repo.repository.merge("feature").await.unwrap();

    let MergeOutcome::Merged { commit } = outcome else {
        panic!("expected a merge commit, got {outcome:?}");
    };
    assert_eq!(
        repo.output.take(),
        "Merge made by the 'three-way' strategy.\n"
    );
    assert_eq!(repo.head_oid(), Some(commit.clone()));

    let merge_commit = repo.repository.database().load_commit(&commit).unwrap();
    assert_eq!(merge_commit.parents(), &[ours, theirs]);
    assert_eq!(merge_commit.message(), "Merge branch 'feature' into main");

    let tree = repo.repository.database().read_commit_tree(&commit).unwrap();
    assert_eq!(
        tree.keys().cloned().collect::<Vec<_>>(),
        vec!["added.txt", "base.txt", "left.txt", "right.txt"]
    );
    assert_eq!(repo.read("left.txt"), "initial\nmain change\n");
    assert_eq!(repo.read("right.txt"), "initial\nfeature change\n");
    assert_eq!(repo.read("added.txt"), "added\n");
    assert!(!repo.exists("obsolete.txt"));

    let status = repo
        .repository
        .status(StatusOptions { porcelain: true })
        .await
        .unwrap();
    assert!(status.is_clean());
}

#[tokio::test]
async fn conflicting_edits_leave_markers_and_merge_state() {
    let (mut repo, ours, theirs) = diverged(
        &[("f.txt", "base\n"), ("other.txt", "x\n")],
        &[("f.txt", "ours\n")],
        &[("f.txt", "theirs\n"), ("clean.txt", "from feature\n")],
        &[],
    )
    .await;

    let outcome = repo.repository.merge("feature").await.unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Conflicted {
            conflicts: vec!["f.txt".to_string()]
        }
    );
    assert_eq!(
        repo.output.take(),
        "CONFLICT (both modified): Merge conflict in f.txt\n\
         Automatic merge failed; fix conflicts and then commit the result.\n"
    );
    assert_eq!(
        repo.read("f.txt"),
        "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> incoming\n"
    );
    assert!(!repo.exists("clean.txt"));
    assert!(!index_tracks(&repo, "clean.txt").await);
    assert_eq!(repo.read("other.txt"), "x\n");
    assert_eq!(repo.head_oid(), Some(ours.clone()));
    assert_eq!(repo.repository.refs().merge_head().unwrap(), Some(theirs.clone()));
    assert_eq!(
        repo.repository.refs().merge_message().unwrap().as_deref(),
        Some("Merge branch 'feature' into main\n\nConflicts:\n\tf.txt\n")
    );

    let error = repo.repository.merge("feature").await.unwrap_err();
    assert_eq!(repository_error(&error), &RepositoryError::MergeInProgress);
    let error = repo.repository.checkout("feature", false).await.unwrap_err();
    assert_eq!(repository_error(&error), &RepositoryError::MergeInProgress);

    repo.write("f.txt", "resolved by hand\n");
    repo.add_all().await;
    let resolution = repo.repository.commit("").await.unwrap();

    let commit = repo.repository.database().load_commit(&resolution).unwrap();
    assert_eq!(commit.parents(), &[ours, theirs]);
    assert!(commit.message().starts_with("Merge branch 'feature' into main"));
    assert_eq!(repo.repository.refs().merge_head().unwrap(), None);

    let tree = repo.repository.database().read_commit_tree(&resolution).unwrap();
    assert_eq!(
        tree.keys().cloned().collect::<Vec<_>>(),
        vec!["f.txt", "other.txt"]
    );
}

#[tokio::test]
async fn modify_delete_conflict_keeps_our_side() {
    let (mut repo, _, _) = diverged(
        &[("f.txt", "base\n"), ("keep.txt", "keep\n")],
        &[("f.txt", "ours\n")],
        &[("keep.txt", "keep\nchanged\n")],
        &["f.txt"],
    )
    .await;

    let outcome = repo.repository.merge("feature").await.unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Conflicted {
            conflicts: vec!["f.txt".to_string()]
        }
    );
    assert!(repo.output.take().contains("CONFLICT (deleted by them)"));
    assert_eq!(
        repo.read("f.txt"),
        "<<<<<<< HEAD\nours\n=======\n>>>>>>> incoming\n"
    );
    assert_eq!(repo.read("keep.txt"), "keep\n");
}

#[tokio::test]
async fn add_add_conflict() {
    let (mut repo, _, _) = diverged(
        &[("base.txt", "base\n")],
        &[("new.txt", "ours")],
        &[("new.txt", "theirs")],
        &[],
    )
    .await;

    repo.repository.merge("feature").await.unwrap();

    assert!(repo.output.take().contains("CONFLICT (both added): Merge conflict in new.txt"));
    assert_eq!(
        repo.read("new.txt"),
        "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> incoming\n"
    );
}

#[tokio::test]
async fn identical_changes_on_both_sides_merge_cleanly() {
    let (mut repo, _, _) = diverged(
        &[("f.txt", "base\n")],
        &[("f.txt", "same\n"), ("ours.txt", "o\n")],
        &[("f.txt", "same\n"), ("theirs.txt", "t\n")],
        &[],
    )
    .await;

    let outcome = repo.repository.merge("feature").await.unwrap();

    assert!(matches!(outcome, MergeOutcome::Merged { .. }));
    assert_eq!(repo.read("f.txt"), "same\n");
}

#[tokio::test]
async fn merging_an_ancestor_records_a_merge_commit_with_our_tree() {
    let mut repo = init_repository().await;
    let old = repo.commit_files(&[("a.txt", "one\n")], "A").await;
    repo.branch("old").await;
    let head = repo.commit_files(&[("a.txt", "one\ntwo\n")], "B").await;

    let outcome = repo.repository.merge("old").await.unwrap();

    let MergeOutcome::Merged { commit } = outcome else {
        panic!("expected a merge commit, got {outcome:?}");
    };
    assert_eq!(
        repo.output.take(),
        "Merge made by the 'three-way' strategy.\n"
    );
    assert_eq!(repo.head_oid(), Some(commit.clone()));

    let database = repo.repository.database();
    let merge_commit = database.load_commit(&commit).unwrap();
    assert_eq!(merge_commit.parents(), &[head.clone(), old]);
    assert_eq!(
        database.read_commit_tree(&commit).unwrap(),
        database.read_commit_tree(&head).unwrap()
    );
    assert_eq!(repo.read("a.txt"), "one\ntwo\n");
}

#[tokio::test]
async fn merging_the_same_commit_is_already_up_to_date() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "A").await;
    repo.branch("twin").await;

    let outcome = repo.repository.merge("twin").await.unwrap();

    assert_eq!(outcome, MergeOutcome::AlreadyUpToDate);
}

#[tokio::test]
async fn merging_the_current_branch_does_nothing() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "A").await;

    let outcome = repo.repository.merge("main").await.unwrap();

    assert_eq!(outcome, MergeOutcome::AlreadyOnBranch);
}

#[tokio::test]
async fn merging_an_unknown_branch_fails() {
    let mut repo = init_repository().await;
    repo.commit_files(&[("a.txt", "one\n")], "A").await;

    let error = repo.repository.merge("ghost").await.unwrap_err();

    assert_eq!(
        repository_error(&error),
        &RepositoryError::InvalidReference {
            name: "ghost".to_string()
        }
    );
}

#[tokio::test]
async fn merging_in_detached_head_fails() {
    let mut repo = init_repository().await;
    let oid = repo.commit_files(&[("a.txt", "one\n")], "A").await;
    repo.branch("feature").await;
    repo.repository.refs().set_head_detached(&oid).unwrap();

    let error = repo.repository.merge("feature").await.unwrap_err();

    assert_eq!(
        repository_error(&error),
        &RepositoryError::DetachedHead { operation: "merge" }
    );
}

#[tokio::test]
async fn unrelated_histories_are_refused() {
    let mut repo = init_repository().await;
    let root = repo.commit_files(&[("a.txt", "one\n")], "A").await;
    let tree_oid = repo
        .repository
        .database()
        .load_commit(&root)
        .unwrap()
        .tree_oid()
        .clone();
    let orphan = Commit::new(vec![], tree_oid, Author::load_from_env(), "orphan".to_string());
    let orphan_oid = repo.repository.database().store(&orphan).unwrap();
    repo.repository
        .refs()
        .create_branch(
            &BranchName::try_parse("orphan".to_string()).unwrap(),
            &orphan_oid,
        )
        .unwrap();

    let error = repo.repository.merge("orphan").await.unwrap_err();

    assert_eq!(
        repository_error(&error),
        &RepositoryError::UnrelatedHistories
    );
    assert_eq!(repo.head_oid(), Some(root));
}
