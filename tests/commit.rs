use crate::common::command::{
    gitlet_add, gitlet_commit, gitlet_stdout, init_repository_dir, repository_dir,
    run_gitlet_command,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use crate::common::log_commit_ids;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn commit_prepends_to_the_branch_log(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let log = gitlet_stdout(dir, &["log"]);
    let ids = log_commit_ids(&log);

    assert_eq!(ids.len(), 2);
    assert!(log.starts_with(&format!(
        "===\ncommit {}\nDate: Sun Jan 01 12:00:00 2023 +0000\nTrack one and two\n\n",
        ids[0]
    )));
    assert!(log.ends_with("initial commit\n\n"));
}

#[rstest]
fn commit_without_staged_changes_fails(init_repository_dir: TempDir) {
    gitlet_commit(init_repository_dir.path(), "nothing here")
        .assert()
        .code(1)
        .stderr("No changes added to the commit.\n");
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
fn commit_with_blank_message_fails(init_repository_dir: TempDir, #[case] message: &str) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));
    gitlet_add(dir, &["new.txt"]);

    gitlet_commit(dir, message)
        .assert()
        .code(1)
        .stderr("Please enter a commit message.\n");

    assert_eq!(log_commit_ids(&gitlet_stdout(dir, &["log"])).len(), 2);
}

#[rstest]
fn adding_the_committed_version_stages_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    gitlet_add(dir, &["1.txt"]);

    gitlet_commit(dir, "no change")
        .assert()
        .code(1)
        .stderr("No changes added to the commit.\n");
}

#[rstest]
fn re_adding_the_committed_version_unstages_a_change(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    gitlet_add(dir, &["1.txt"]);

    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    gitlet_add(dir, &["1.txt"]);

    gitlet_commit(dir, "no change")
        .assert()
        .code(1)
        .stderr("No changes added to the commit.\n");
}

#[rstest]
fn adding_a_missing_file_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .code(1)
        .stderr("File does not exist.\n");
}

#[rstest]
fn commit_tracks_many_generated_files(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_gitlet_command(dir, &["init"]).assert().success();

    let files = write_generated_files(dir, 5);
    for file in &files {
        let name = file.path.file_name().and_then(|name| name.to_str()).unwrap();
        gitlet_add(dir, &[name]);
    }
    gitlet_commit(dir, "generated").assert().success();

    for file in files {
        std::fs::remove_file(&file.path).unwrap();
        let name = file.path.file_name().and_then(|name| name.to_str()).unwrap();
        run_gitlet_command(dir, &["checkout", "--", name])
            .assert()
            .success();
        assert_eq!(std::fs::read_to_string(&file.path).unwrap(), file.content);
    }
}
