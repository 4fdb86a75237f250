use crate::areas::repository::Repository;
use crate::areas::staging::RemoveOutcome;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::GitletError;

impl Repository {
    pub fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let name = Workspace::normalize(file).ok_or(GitletError::NothingToRemove)?;
        let head_commit = self.head_commit()?;
        let tracked = head_commit.tree().get(&name);

        // the removed version is the working copy when there is one, else the committed one
        let snapshot = || match tracked {
            Some(oid) if !self.workspace().file_exists(&name) => Ok(oid.clone()),
            _ => self.database().store(&self.workspace().parse_blob(&name)?),
        };

        let mut staging = self.staging_mut();
        let outcome = staging.stage_remove(&name, tracked, snapshot)?;
        staging.write_updates()?;

        if outcome == RemoveOutcome::Removed {
            self.workspace().remove_file(&name)?;
        }

        Ok(())
    }
}
