use assert_fs::TempDir;
use assert_fs::prelude::*;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::branch::branch_name::BranchName;
use gitlet::artifacts::core::config::Config;
use gitlet::artifacts::core::error::{GitletError, Missing};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Writer whose output stays readable after the repository takes ownership of it
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn config() -> Config {
    Config {
        commit_date: Some(Config::parse_date("2024-02-29 08:30:00 +0200").unwrap()),
        no_pager: true,
    }
}

fn open(dir: &TempDir) -> (Repository, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let repository = Repository::with_config(
        &dir.path().to_string_lossy(),
        Box::new(buffer.clone()),
        config(),
    )
    .unwrap();

    (repository, buffer)
}

#[fixture]
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    open(&dir).0.init().unwrap();
    dir
}

fn error_kind(result: anyhow::Result<()>) -> GitletError {
    let err = result.unwrap_err();
    GitletError::find(&err).cloned().unwrap()
}

#[rstest]
fn independent_repositories_in_one_process(initialized: TempDir) {
    let second = TempDir::new().unwrap();
    let (mut other, _) = open(&second);
    other.init().unwrap();

    initialized.child("f.txt").write_str("first").unwrap();
    let (mut first, _) = open(&initialized);
    first.add("f.txt").unwrap();
    first.commit("only in the first repository").unwrap();

    assert_eq!(
        error_kind(other.find("only in the first")),
        GitletError::NotFound(Missing::CommitWithMessage)
    );
    assert!(first.find("only in the first").is_ok());
}

#[rstest]
fn commits_use_the_configured_timestamp(initialized: TempDir) {
    initialized.child("f.txt").write_str("content").unwrap();
    let (mut repository, buffer) = open(&initialized);
    repository.add("f.txt").unwrap();
    repository.commit("dated").unwrap();

    repository.log().unwrap();

    assert!(
        buffer
            .contents()
            .contains("Date: Thu Feb 29 08:30:00 2024 +0200\ndated\n")
    );
}

#[rstest]
fn staging_survives_reopening_the_repository(initialized: TempDir) {
    initialized.child("f.txt").write_str("content").unwrap();
    open(&initialized).0.add("f.txt").unwrap();

    let (mut repository, _) = open(&initialized);
    assert!(!repository.staging().is_empty());
    repository.commit("from a fresh context").unwrap();
    assert!(repository.staging().is_empty());
}

#[rstest]
fn merge_errors_are_typed(initialized: TempDir) {
    let (mut repository, buffer) = open(&initialized);
    repository.branch("other").unwrap();

    assert_eq!(error_kind(repository.merge("master")), GitletError::SelfMerge);
    assert_eq!(
        error_kind(repository.merge("other")),
        GitletError::AlreadyMerged
    );

    repository.checkout_branch("other").unwrap();
    initialized.child("f.txt").write_str("ahead").unwrap();
    repository.add("f.txt").unwrap();
    repository.commit("ahead").unwrap();
    repository.checkout_branch("master").unwrap();

    repository.merge("other").unwrap();
    assert_eq!(buffer.contents(), "Current branch fast-forwarded.\n");
    assert_eq!(
        repository.head().unwrap().oid,
        repository
            .refs()
            .read_branch(&BranchName::try_parse("other".to_string()).unwrap())
            .unwrap()
            .unwrap()
    );
}

#[rstest]
#[case::too_short("a")]
#[case::not_hex("zz")]
fn unusable_prefixes_name_no_commit(initialized: TempDir, #[case] prefix: &str) {
    let (mut repository, _) = open(&initialized);

    assert_eq!(
        error_kind(repository.reset(prefix)),
        GitletError::NotFound(Missing::Commit)
    );
}
