use crate::areas::repository::Repository;
use crate::areas::staging::AddOutcome;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::{GitletError, Missing};
use crate::artifacts::objects::object::Object;
use tracing::debug;

impl Repository {
    pub fn add(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let name = Workspace::normalize(file)
            .filter(|name| self.workspace().file_exists(name))
            .ok_or(GitletError::NotFound(Missing::File))?;

        let blob = self.workspace().parse_blob(&name)?;
        let oid = blob.object_id()?;
        let head_commit = self.head_commit()?;

        let mut staging = self.staging_mut();
        let outcome = staging.stage_add(&name, oid, head_commit.tree().get(&name));
        if outcome == AddOutcome::Staged {
            self.database().store(&blob)?;
        }
        staging.write_updates()?;
        debug!(file = %name, ?outcome, "staged file");

        Ok(())
    }
}
