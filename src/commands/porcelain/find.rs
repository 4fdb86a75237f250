use crate::areas::repository::Repository;
use crate::artifacts::core::error::{GitletError, Missing};
use crate::artifacts::log::log_entry::parse_commit_ids;

impl Repository {
    /// Print the id of every commit whose message contains `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut found = false;
        for oid in parse_commit_ids(&self.logs().read_global()?) {
            let commit = self.database().load_commit(&oid)?;
            if commit.message().contains(message) {
                writeln!(self.writer(), "{oid}")?;
                found = true;
            }
        }

        if !found {
            return Err(GitletError::NotFound(Missing::CommitWithMessage).into());
        }

        Ok(())
    }
}
