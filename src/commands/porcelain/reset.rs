use crate::areas::repository::Repository;
use tracing::info;

impl Repository {
    /// Move the current branch to `commit` and check out its snapshot
    pub fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_oid = self.resolve_commit(commit)?;
        self.move_to_commit(&target_oid)?;

        let head = self.refs().advance_head(target_oid)?;
        self.regenerate_branch_log(&head.branch, &head.oid)?;
        info!(branch = %head.branch, oid = %head.oid, "reset");

        Ok(())
    }
}
