//! Commit logs
//!
//! `logs/HEAD` is the global log; `logs/refs/heads/<branch>` is the log of a
//! branch. Both are plain text with the newest entry first.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::log::log_entry::LogEntry;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Logs {
    /// Path to the logs directory (`.gitlet/logs`)
    path: Box<Path>,
}

impl Logs {
    pub fn new(path: Box<Path>) -> Self {
        Logs { path }
    }

    /// Record a new commit made on `branch` in its log and the global log
    pub fn record(&self, branch: &BranchName, entry: &LogEntry) -> anyhow::Result<()> {
        let rendered = entry.to_string();

        self.prepend(&self.branch_log_path(branch), &rendered)?;
        self.prepend(&self.global_log_path(), &rendered)?;
        debug!(%branch, oid = %entry.oid(), "recorded log entry");

        Ok(())
    }

    pub fn read_branch(&self, branch: &BranchName) -> anyhow::Result<String> {
        Self::read_log(&self.branch_log_path(branch))
    }

    pub fn read_global(&self) -> anyhow::Result<String> {
        Self::read_log(&self.global_log_path())
    }

    /// Start the log of a new branch as a copy of `source`'s
    pub fn copy_branch(&self, source: &BranchName, target: &BranchName) -> anyhow::Result<()> {
        let content = self.read_branch(source)?;
        Self::write_log(&self.branch_log_path(target), &content)
    }

    /// Replace a branch log, entries given newest first
    pub fn rewrite_branch(
        &self,
        branch: &BranchName,
        entries: impl IntoIterator<Item = LogEntry>,
    ) -> anyhow::Result<()> {
        let content = entries
            .into_iter()
            .map(|entry| entry.to_string())
            .collect::<String>();

        Self::write_log(&self.branch_log_path(branch), &content)?;
        debug!(%branch, "rewrote branch log");

        Ok(())
    }

    pub fn remove_branch(&self, branch: &BranchName) -> anyhow::Result<()> {
        let log_path = self.branch_log_path(branch);
        if log_path.is_file() {
            std::fs::remove_file(&log_path)
                .with_context(|| format!("Unable to remove log {}", log_path.display()))?;
            self.prune_empty_parent_dirs(&log_path)?;
        }

        Ok(())
    }

    fn prepend(&self, log_path: &Path, rendered: &str) -> anyhow::Result<()> {
        let previous = Self::read_log(log_path)?;
        Self::write_log(log_path, &format!("{rendered}{previous}"))
    }

    fn read_log(log_path: &Path) -> anyhow::Result<String> {
        if !log_path.exists() {
            return Ok(String::new());
        }

        std::fs::read_to_string(log_path)
            .with_context(|| format!("Unable to read log {}", log_path.display()))
    }

    fn write_log(log_path: &Path, content: &str) -> anyhow::Result<()> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create log directory {}", parent.display()))?;
        }

        std::fs::write(log_path, content)
            .with_context(|| format!("Unable to write log {}", log_path.display()))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Unable to remove empty log directory {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn global_log_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    fn heads_path(&self) -> PathBuf {
        self.path.join("refs").join("heads")
    }

    fn branch_log_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_path().join(branch.as_ref())
    }
}
