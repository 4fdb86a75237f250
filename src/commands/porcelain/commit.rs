use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use tracing::info;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        if self.staging().is_empty() {
            return Err(GitletError::NothingToCommit.into());
        }
        if message.trim().is_empty() {
            return Err(GitletError::BadCommitMessage.into());
        }

        let head = self.head()?;
        let parent_tree = self.database().load_commit(&head.oid)?.tree().clone();
        self.write_commit(vec![head.oid], parent_tree, message)?;

        Ok(())
    }

    /// Commit `tree` with the staged changes applied on top, then clear staging
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        mut tree: Tree,
        message: &str,
    ) -> anyhow::Result<Head> {
        {
            let staging = self.staging();
            for (name, oid) in staging.additions() {
                tree.insert(name.clone(), oid.clone());
            }
            for name in staging.removals() {
                tree.remove(name);
            }
        }

        let branch = self.head()?.branch;
        let commit = Commit::new(
            parents,
            tree,
            message.to_string(),
            self.config().now(),
            branch.to_string(),
        );
        let head = self.record_commit(&commit)?;

        let mut staging = self.staging_mut();
        staging.clear();
        staging.write_updates()?;
        info!(branch = %head.branch, oid = %head.oid, "committed");

        Ok(head)
    }
}
