use crate::areas::repository::Repository;
use crate::artifacts::log::log_entry::ENTRY_SEPARATOR;
use colored::Colorize;

impl Repository {
    /// Print the log of the current branch, newest commit first
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch = self.head()?.branch;
        let log = self.logs().read_branch(&branch)?;
        self.show_log(&log)
    }

    /// Print every commit ever made, newest first
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let log = self.logs().read_global()?;
        self.show_log(&log)
    }

    fn show_log(&self, log: &str) -> anyhow::Result<()> {
        let mut writer = self.writer();
        let mut after_separator = false;

        for line in log.lines() {
            if after_separator && line.starts_with("commit ") {
                writeln!(writer, "{}", line.yellow())?;
            } else {
                writeln!(writer, "{line}")?;
            }
            after_separator = line == ENTRY_SEPARATOR;
        }

        Ok(())
    }
}
