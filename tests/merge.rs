use crate::common::command::{
    commit_file, gitlet_checkout, gitlet_commit, gitlet_stdout, init_repository_dir,
    run_gitlet_command,
};
use crate::common::file::{FileSpec, read_file, write_file};
use crate::common::log_commit_ids;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

fn create_branch(dir: &Path, name: &str) {
    run_gitlet_command(dir, &["branch", name])
        .assert()
        .success();
}

fn branch_tip(dir: &Path, name: &str) -> String {
    read_file(&dir.join(".gitlet/refs/heads").join(name))
}

/// Removing a file on one side and editing it on the other conflicts
///
/// History:
///       C (tracks g)
///      / \
///  -g /   \ g'
///   master  other
#[rstest]
fn delete_versus_modify_conflicts(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "g", "g", "track g");
    create_branch(dir, "other");
    run_gitlet_command(dir, &["rm", "g"]).assert().success();
    gitlet_commit(dir, "drop g").assert().success();
    gitlet_checkout(dir, "other");
    commit_file(dir, "g", "g changed\n", "change g");
    gitlet_checkout(dir, "master");

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    init_repository_dir
        .child("g")
        .assert("<<<<<<< HEAD\n=======\ng changed\n>>>>>>>\n");

    let log = gitlet_stdout(dir, &["log"]);
    let ids = log_commit_ids(&log);
    let (master_parent, other_tip) = (&ids[1], branch_tip(dir, "other"));
    assert!(log.starts_with(&format!(
        "===\ncommit {}\nMerge: {} {}\nDate: Sun Jan 01 12:00:00 2023 +0000\nMerged other into master.\n\n",
        ids[0],
        &master_parent[..7],
        &other_tip[..7]
    )));
}

#[rstest]
fn conflicting_edits_write_both_versions(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "f", "base", "track f");
    create_branch(dir, "other");
    commit_file(dir, "f", "A", "f is A");
    gitlet_checkout(dir, "other");
    commit_file(dir, "f", "B", "f is B");
    gitlet_checkout(dir, "master");

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    init_repository_dir
        .child("f")
        .assert("<<<<<<< HEAD\nA=======\nB>>>>>>>\n");

    // the merge commit records the conflicted text itself
    std::fs::remove_file(dir.join("f")).unwrap();
    run_gitlet_command(dir, &["checkout", "--", "f"])
        .assert()
        .success();
    init_repository_dir
        .child("f")
        .assert("<<<<<<< HEAD\nA=======\nB>>>>>>>\n");
}

#[rstest]
#[case::other_into_master("master", "other")]
#[case::master_into_other("other", "master")]
fn disjoint_additions_merge_cleanly(
    init_repository_dir: TempDir,
    #[case] into: &str,
    #[case] from: &str,
) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    commit_file(dir, "k", "k on master", "add k");
    gitlet_checkout(dir, "other");
    commit_file(dir, "h", "h on other", "add h");
    if into == "master" {
        gitlet_checkout(dir, "master");
    }

    run_gitlet_command(dir, &["merge", from])
        .assert()
        .success()
        .stdout("");

    init_repository_dir.child("k").assert("k on master");
    init_repository_dir.child("h").assert("h on other");
    init_repository_dir.child("1.txt").assert("one");
    let log = gitlet_stdout(dir, &["log"]);
    assert!(log.contains(&format!("Merged {from} into {into}.\n")));
    assert!(gitlet_stdout(dir, &["status"]).contains("=== Staged Files ===\n\n"));
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    gitlet_checkout(dir, "other");
    commit_file(dir, "ahead.txt", "ahead", "move ahead");
    run_gitlet_command(dir, &["rm", "1.txt"]).assert().success();
    gitlet_commit(dir, "drop one").assert().success();
    gitlet_checkout(dir, "master");
    let commits_before = log_commit_ids(&gitlet_stdout(dir, &["global-log"])).len();

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(branch_tip(dir, "master"), branch_tip(dir, "other"));
    assert_eq!(
        log_commit_ids(&gitlet_stdout(dir, &["global-log"])).len(),
        commits_before
    );
    assert!(gitlet_stdout(dir, &["status"]).starts_with("=== Branches ===\n*master\nother\n"));
    init_repository_dir.child("ahead.txt").assert("ahead");
    init_repository_dir
        .child("1.txt")
        .assert(predicate::path::missing());
    // the log follows the first-parent chain of the new tip
    assert_eq!(log_commit_ids(&gitlet_stdout(dir, &["log"])).len(), 4);
}

#[rstest]
fn fast_forward_blocked_by_untracked_file_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    gitlet_checkout(dir, "other");
    commit_file(dir, "f", "from other", "add f");
    gitlet_checkout(dir, "master");
    write_file(FileSpec::new(dir.join("f"), "local".to_string()));

    let tip = branch_tip(dir, "master");
    let head = std::fs::read(dir.join(".gitlet/HEAD")).unwrap();
    let log = gitlet_stdout(dir, &["log"]);

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr("There is an untracked file in the way; delete it, or add and commit it first.\n");

    init_repository_dir.child("f").assert("local");
    assert_eq!(branch_tip(dir, "master"), tip);
    assert_eq!(std::fs::read(dir.join(".gitlet/HEAD")).unwrap(), head);
    assert_eq!(gitlet_stdout(dir, &["log"]), log);
}

#[rstest]
fn merging_an_ancestor_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "old");
    commit_file(dir, "new.txt", "new", "move on");
    let tip = branch_tip(dir, "master");

    run_gitlet_command(dir, &["merge", "old"])
        .assert()
        .code(1)
        .stderr("Given branch is an ancestor of the current branch.\n");

    assert_eq!(branch_tip(dir, "master"), tip);
}

#[rstest]
fn identical_changes_produce_nothing_to_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    commit_file(dir, "1.txt", "same edit", "edit on master");
    gitlet_checkout(dir, "other");
    commit_file(dir, "1.txt", "same edit", "edit on other");
    gitlet_checkout(dir, "master");

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr("No changes added to the commit.\n");
}

#[rstest]
#[case::self_merge("master", "Cannot merge a branch with itself.\n")]
#[case::missing_branch("nope", "A branch with that name does not exist.\n")]
fn merge_precondition_failures(
    init_repository_dir: TempDir,
    #[case] branch: &str,
    #[case] message: &str,
) {
    let dir = init_repository_dir.path();
    let commits_before = gitlet_stdout(dir, &["global-log"]);

    run_gitlet_command(dir, &["merge", branch])
        .assert()
        .code(1)
        .stderr(message.to_string());

    assert_eq!(gitlet_stdout(dir, &["global-log"]), commits_before);
}

#[rstest]
fn merge_with_staged_changes_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    write_file(FileSpec::new(dir.join("pending.txt"), "pending".to_string()));
    run_gitlet_command(dir, &["add", "pending.txt"])
        .assert()
        .success();

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr("You have uncommitted changes.\n");
}

#[rstest]
fn untracked_file_in_the_way_aborts_the_whole_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    commit_file(dir, "1.txt", "one on master", "edit one");
    gitlet_checkout(dir, "other");
    commit_file(dir, "a/2.txt", "two on other", "edit two");
    commit_file(dir, "u.txt", "committed", "add u");
    gitlet_checkout(dir, "master");
    write_file(FileSpec::new(dir.join("u.txt"), "local".to_string()));
    let tip = branch_tip(dir, "master");
    let objects_before = walk_objects(dir);

    run_gitlet_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr("There is an untracked file in the way; delete it, or add and commit it first.\n");

    init_repository_dir.child("u.txt").assert("local");
    init_repository_dir.child("a/2.txt").assert("two");
    init_repository_dir.child("1.txt").assert("one on master");
    assert_eq!(branch_tip(dir, "master"), tip);
    assert_eq!(walk_objects(dir), objects_before);
}

fn walk_objects(dir: &Path) -> Vec<String> {
    let mut objects = walkdir::WalkDir::new(dir.join(".gitlet/objects"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().display().to_string())
        .collect::<Vec<_>>();
    objects.sort();
    objects
}
