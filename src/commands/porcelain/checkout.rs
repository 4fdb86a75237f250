use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::{GitletError, Missing};
use crate::artifacts::objects::object_id::ObjectId;
use tracing::info;

impl Repository {
    /// Switch to `branch`, replacing the working directory with its snapshot
    pub fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch = BranchName::try_parse(branch.to_string())
            .map_err(|_| GitletError::NotFound(Missing::Branch))?;
        let target_oid = self
            .refs()
            .read_branch(&branch)?
            .ok_or(GitletError::NotFound(Missing::Branch))?;
        if self.refs().is_current_branch(&branch)? {
            return Err(GitletError::NoOp.into());
        }

        self.move_to_commit(&target_oid)?;
        self.refs().write_head(&Head::new(branch.clone(), target_oid))?;
        info!(%branch, "switched branch");

        Ok(())
    }

    /// Restore one file from `commit` (the current commit when `None`)
    ///
    /// Staging and HEAD are left alone.
    pub fn checkout_file(&mut self, commit: Option<&str>, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_oid = match commit {
            Some(prefix) => self.resolve_commit(prefix)?,
            None => self.head()?.oid,
        };
        let commit = self.database().load_commit(&commit_oid)?;

        let name = Workspace::normalize(file).ok_or(GitletError::NotFound(Missing::FileInCommit))?;
        let blob_oid = commit
            .tree()
            .get(&name)
            .ok_or(GitletError::NotFound(Missing::FileInCommit))?;

        let content = self.database().load_content(blob_oid)?;
        self.workspace().write_file(&name, &content)
    }

    /// Replace the working directory with the snapshot of `target_oid` and
    /// clear staging; refs are the caller's business
    pub(crate) fn move_to_commit(&self, target_oid: &ObjectId) -> anyhow::Result<()> {
        let source_tree = self.head_commit()?.tree().clone();
        let target_tree = self.database().load_commit(target_oid)?.tree().clone();

        let migration = Migration::for_checkout(&source_tree, &target_tree);
        self.migrate(&source_tree, &migration)?;

        let mut staging = self.staging_mut();
        staging.clear();
        staging.write_updates()
    }
}
