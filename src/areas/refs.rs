//! Reference store (branches and HEAD)
//!
//! Branches are named, mutable pointers to commits. HEAD records which branch is
//! checked out together with the commit it points at.
//!
//! ## File Format
//!
//! - `refs/heads/<name>`: the 40-character hex id of the branch tip
//! - `HEAD`: a record with signature `GHED`, the branch name (length-prefixed)
//!   and the raw 20-byte commit id
//!
//! Every write takes an exclusive lock on the file being written.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::{Existing, GitletError, Missing};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record::{RecordRead, RecordWrite};
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

const HEAD_SIGNATURE: &[u8; 4] = b"GHED";

/// Name of the HEAD record file
pub const HEAD_REF_NAME: &str = "HEAD";

/// The checked-out branch and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Head {
    pub branch: BranchName,
    pub oid: ObjectId,
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (`.gitlet`)
    path: Box<Path>,
}

impl Refs {
    pub fn read_head(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let mut reader = content.as_slice();

        reader.expect_signature(HEAD_SIGNATURE)?;
        let branch = BranchName::try_parse(reader.read_str_field()?)?;
        let oid = ObjectId::read_h40_from(&mut reader).context("HEAD has no commit id")?;

        Ok(Head { branch, oid })
    }

    pub fn write_head(&self, head: &Head) -> anyhow::Result<()> {
        let mut content = Vec::new();
        content.write_signature(HEAD_SIGNATURE)?;
        content.write_str_field(head.branch.as_ref())?;
        head.oid.write_h40_to(&mut content)?;

        self.update_ref_file(&self.head_path(), &content)?;
        debug!(branch = %head.branch, oid = %head.oid, "updated HEAD");

        Ok(())
    }

    /// Move the current branch and HEAD together to `oid`
    pub fn advance_head(&self, oid: ObjectId) -> anyhow::Result<Head> {
        let Head { branch, .. } = self.read_head()?;
        self.update_branch(&branch, &oid)?;

        let head = Head::new(branch, oid);
        self.write_head(&head)?;

        Ok(head)
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.read_head()?.branch == branch_name)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch_name), oid.as_ref().as_bytes())?;
        debug!(branch = %branch_name, %oid, "updated branch");

        Ok(())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(GitletError::AlreadyExists(Existing::Branch).into());
        }

        self.update_branch(name, source_oid)
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(name)?
            .ok_or(GitletError::NotFound(Missing::BranchName))?;
        if self.is_current_branch(name)? {
            return Err(GitletError::CannotDeleteCurrent.into());
        }

        let branch_path = self.branch_path(name);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        debug!(branch = %name, %oid, "deleted branch");

        Ok(oid)
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path.to_string_lossy().replace('\\', "/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", path)
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content)?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.heads_path().join(branch_name.as_ref()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
