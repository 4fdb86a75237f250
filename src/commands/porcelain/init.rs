use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::{Existing, GitletError};
use crate::artifacts::log::log_entry::LogEntry;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;
use tracing::info;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.git_path().exists() {
            return Err(GitletError::AlreadyExists(Existing::Repository).into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        let branch = BranchName::default_branch();
        let root = Commit::root(branch.as_ref());
        let root_oid = self
            .database()
            .store(&root)
            .context("Failed to store the root commit")?;

        self.refs()
            .update_branch(&branch, &root_oid)
            .context("Failed to create the default branch")?;
        self.refs()
            .write_head(&Head::new(branch.clone(), root_oid.clone()))
            .context("Failed to create the HEAD record")?;
        self.logs().record(&branch, &LogEntry::new(root_oid, &root))?;

        info!(path = %self.path().display(), "initialized repository");

        Ok(())
    }
}
