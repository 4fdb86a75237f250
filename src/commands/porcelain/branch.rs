use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::{GitletError, Missing};
use tracing::info;

impl Repository {
    /// Create `branch_name` at the current commit without switching to it
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head = self.head()?;

        self.refs().create_branch(&branch_name, &head.oid)?;
        self.logs().copy_branch(&head.branch, &branch_name)?;
        info!(branch = %branch_name, oid = %head.oid, "created branch");

        Ok(())
    }

    /// Delete the pointer `branch_name`; its commits stay in the store
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::NotFound(Missing::BranchName))?;

        let oid = self.refs().delete_branch(&branch_name)?;
        self.logs().remove_branch(&branch_name)?;
        info!(branch = %branch_name, %oid, "deleted branch");

        Ok(())
    }
}
