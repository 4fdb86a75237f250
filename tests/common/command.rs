use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Timestamp stamped on every commit made through these helpers
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository whose master branch has one commit tracking
/// `1.txt` ("one") and `a/2.txt` ("two")
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));

    gitlet_add(repository_dir.path(), &["1.txt", "a/2.txt"]);
    gitlet_commit(repository_dir.path(), "Track one and two")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("GITLET_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", message])
}

pub fn gitlet_add(dir: &Path, files: &[&str]) {
    for file in files {
        run_gitlet_command(dir, &["add", file]).assert().success();
    }
}

pub fn gitlet_checkout(dir: &Path, branch: &str) {
    run_gitlet_command(dir, &["checkout", branch])
        .assert()
        .success();
}

/// Write `content` to `name`, stage it and commit it in one go
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    gitlet_add(dir, &[name]);
    gitlet_commit(dir, message).assert().success();
}

pub fn gitlet_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_gitlet_command(dir, args)
        .output()
        .expect("Failed to run gitlet");
    assert!(output.status.success(), "gitlet {args:?} failed: {output:?}");

    String::from_utf8(output.stdout).expect("gitlet printed invalid UTF-8")
}
