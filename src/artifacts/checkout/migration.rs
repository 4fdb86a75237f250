//! Checkout migration and untracked-file detection
//!
//! Moving the working directory from one tree to another happens in two
//! phases:
//!
//! 1. Plan: compute which files are written and which are deleted, then scan
//!    the working directory for untracked files the plan would clobber.
//! 2. Apply: only when the scan found nothing, write and delete files.
//!
//! A failed scan returns before anything on disk has been touched.

use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create a file not tracked by the source tree
    Add,
    /// Delete a file tracked by the source tree
    Delete,
    /// Overwrite a file tracked by the source tree
    Modify,
}

/// Planned actions per filename
pub type ActionsSet = BTreeMap<String, (ActionType, Option<ObjectId>)>;

/// Untracked files in the way, grouped by how they would be lost
pub type ConflictsSet = BTreeMap<ConflictType, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    actions: ActionsSet,
}

impl Migration {
    /// Plan for checkout and reset: every file of `target` is (re)written and
    /// every file tracked by `source` but absent from `target` is deleted
    pub fn for_checkout(source: &Tree, target: &Tree) -> Self {
        Self::plan(source, target, true)
    }

    /// Plan for merge: only files whose content changes are written
    pub fn for_merge(source: &Tree, target: &Tree) -> Self {
        Self::plan(source, target, false)
    }

    fn plan(source: &Tree, target: &Tree, rewrite_unchanged: bool) -> Self {
        let mut actions = ActionsSet::new();

        for name in Tree::union_names(&[source, target]) {
            let action = match (source.get(name), target.get(name)) {
                (Some(_), None) => (ActionType::Delete, None),
                (None, Some(new)) => (ActionType::Add, Some(new.clone())),
                (Some(old), Some(new)) if old != new || rewrite_unchanged => {
                    (ActionType::Modify, Some(new.clone()))
                }
                _ => continue,
            };
            actions.insert(name.to_string(), action);
        }

        debug!(actions = actions.len(), "planned migration");
        Migration { actions }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Filenames planned for `action`, sorted
    pub fn paths(&self, action: ActionType) -> impl Iterator<Item = &String> {
        self.actions
            .iter()
            .filter(move |(_, (kind, _))| *kind == action)
            .map(|(name, _)| name)
    }

    /// Filenames and blob ids written by `action`, sorted
    pub fn writes(&self, action: ActionType) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.actions
            .iter()
            .filter(move |(_, (kind, _))| *kind == action)
            .filter_map(|(name, (_, oid))| oid.as_ref().map(|oid| (name, oid)))
    }

    /// Scan the working directory for untracked files this plan would clobber
    ///
    /// A working file is untracked when `source` does not track it and it has
    /// no staged change. It is in the way when the plan writes different
    /// content over it, or when the plan needs its path as a directory (or
    /// needs a directory holding it to be a file).
    pub fn detect_conflicts(
        &self,
        source: &Tree,
        staging: &StagingArea,
        workspace: &Workspace,
    ) -> anyhow::Result<ConflictsSet> {
        let mut conflicts = ConflictsSet::new();

        let untracked = workspace
            .list_files()?
            .into_iter()
            .filter(|name| !source.contains(name) && !staging.contains(name))
            .collect::<BTreeSet<_>>();
        if untracked.is_empty() {
            return Ok(conflicts);
        }

        for (name, oid) in self.writes(ActionType::Add).chain(self.writes(ActionType::Modify)) {
            if untracked.contains(name) {
                let current = workspace.parse_blob(name)?.object_id()?;
                if &current != oid {
                    conflicts
                        .entry(ConflictType::UntrackedOverwritten)
                        .or_default()
                        .push(name.clone());
                }
                continue;
            }

            // untracked file where the plan needs a directory
            let blocking_parent = Path::new(name.as_str())
                .ancestors()
                .skip(1)
                .filter_map(|ancestor| ancestor.to_str())
                .find(|ancestor| untracked.contains(*ancestor));
            if let Some(parent) = blocking_parent {
                conflicts
                    .entry(ConflictType::UntrackedRemoved)
                    .or_default()
                    .push(parent.to_string());
            }

            // untracked files inside a directory the plan turns into a file
            if workspace.dir_exists(name) {
                let prefix = format!("{name}/");
                conflicts
                    .entry(ConflictType::UntrackedRemoved)
                    .or_default()
                    .extend(
                        untracked
                            .iter()
                            .filter(|candidate| candidate.starts_with(&prefix))
                            .cloned(),
                    );
            }
        }

        conflicts.retain(|_, paths| {
            paths.sort();
            paths.dedup();
            !paths.is_empty()
        });
        Ok(conflicts)
    }

    /// Fail with `UntrackedFileConflict` if any untracked file is in the way
    pub fn check_untracked(
        &self,
        source: &Tree,
        staging: &StagingArea,
        workspace: &Workspace,
    ) -> anyhow::Result<()> {
        let conflicts = self.detect_conflicts(source, staging, workspace)?;
        if conflicts.is_empty() {
            return Ok(());
        }

        for (conflict_type, paths) in &conflicts {
            warn!(%conflict_type, files = ?paths, "untracked files in the way");
        }
        Err(GitletError::UntrackedFileConflict.into())
    }
}
