use crate::areas::database::Database;
use crate::areas::logs::Logs;
use crate::areas::refs::{Head, Refs};
use crate::areas::staging::StagingArea;
use crate::areas::workspace::{REPOSITORY_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::log::log_entry::LogEntry;
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use std::cell::{Ref, RefCell, RefMut};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Explicit context every command runs against
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    config: Config,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    logs: Logs,
    staging: RefCell<StagingArea>,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        Self::with_config(path, writer, Config::load_from_env()?)
    }

    pub fn with_config(
        path: &str,
        writer: Box<dyn std::io::Write>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let git_path = path.join(REPOSITORY_DIR);

        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.clone().into_boxed_path());
        let logs = Logs::new(git_path.join("logs").into_boxed_path());
        let mut staging = StagingArea::new(git_path.join("staging").into_boxed_path());
        staging.rehydrate()?;

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            config,
            database,
            workspace,
            refs,
            logs,
            staging: RefCell::new(staging),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.git_path().is_dir() {
            return Err(GitletError::NotInitialized.into());
        }

        Ok(())
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn logs(&self) -> &Logs {
        &self.logs
    }

    pub fn staging(&self) -> Ref<'_, StagingArea> {
        self.staging.borrow()
    }

    pub fn staging_mut(&self) -> RefMut<'_, StagingArea> {
        self.staging.borrow_mut()
    }

    pub fn head(&self) -> anyhow::Result<Head> {
        self.refs.read_head()
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.head()?.oid)
    }

    pub fn load_slim_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.database.load_commit(oid)?.to_slim(oid.clone()))
    }

    pub fn split_point_finder(
        &self,
    ) -> SplitPointFinder<impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_> {
        SplitPointFinder::new(|oid: &ObjectId| self.load_slim_commit(oid))
    }

    /// Resolve a full id or an abbreviated prefix to a commit id
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        self.database
            .resolve_prefix(prefix, Some(ObjectType::Commit))
    }

    /// Move the working directory from `source` to `target`
    ///
    /// Nothing is written unless the untracked-file scan comes back clean.
    pub fn migrate(&self, source: &Tree, migration: &Migration) -> anyhow::Result<()> {
        migration.check_untracked(source, &self.staging(), &self.workspace)?;
        self.workspace
            .apply_migration(migration, |oid| self.database.load_content(oid))
    }

    /// Store `commit`, advance the current branch and HEAD to it and log it
    pub fn record_commit(&self, commit: &Commit) -> anyhow::Result<Head> {
        let oid = self.database.store(commit)?;
        let head = self.refs.advance_head(oid.clone())?;
        self.logs.record(&head.branch, &LogEntry::new(oid, commit))?;

        Ok(head)
    }

    /// Rebuild the log of `branch` from the first-parent chain ending at `tip`
    pub fn regenerate_branch_log(&self, branch: &BranchName, tip: &ObjectId) -> anyhow::Result<()> {
        let mut entries = Vec::new();
        let mut next = Some(tip.clone());

        while let Some(oid) = next {
            let commit = self.database.load_commit(&oid)?;
            next = commit.parent().cloned();
            entries.push(LogEntry::new(oid, &commit));
        }
        debug!(%branch, entries = entries.len(), "regenerating branch log");

        self.logs.rewrite_branch(branch, entries)
    }
}
