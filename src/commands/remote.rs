use crate::areas::repository::Repository;
use crate::artifacts::core::error::GitletError;

// Remote repositories are recognised on the command line but never contacted.
impl Repository {
    pub fn add_remote(&mut self, _name: &str, _path: &str) -> anyhow::Result<()> {
        self.unsupported("add-remote")
    }

    pub fn rm_remote(&mut self, _name: &str) -> anyhow::Result<()> {
        self.unsupported("rm-remote")
    }

    pub fn push(&mut self, _remote: &str, _branch: &str) -> anyhow::Result<()> {
        self.unsupported("push")
    }

    pub fn fetch(&mut self, _remote: &str, _branch: &str) -> anyhow::Result<()> {
        self.unsupported("fetch")
    }

    pub fn pull(&mut self, _remote: &str, _branch: &str) -> anyhow::Result<()> {
        self.unsupported("pull")
    }

    fn unsupported(&self, command: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        Err(GitletError::Unsupported(command.to_string()).into())
    }
}
