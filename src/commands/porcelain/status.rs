use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusReport;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head = self.head()?;
        let head_commit = self.database().load_commit(&head.oid)?;

        let report = StatusReport::compute(
            self.refs().list_branches()?,
            head.branch,
            head_commit.tree(),
            &self.staging(),
            self.workspace(),
        )?;

        write!(self.writer(), "{report}")?;

        Ok(())
    }
}
