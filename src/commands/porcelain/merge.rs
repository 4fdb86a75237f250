use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::{GitletError, Missing};
use crate::artifacts::merge::resolution::TreeMerge;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::Tree;
use tracing::{info, warn};

const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge `other_branch` into the current branch
    ///
    /// Every failure is detected before the working directory, staging or
    /// refs are touched.
    pub fn merge(&mut self, other_branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        if !self.staging().is_empty() {
            return Err(GitletError::UncommittedChanges.into());
        }

        let other_branch = BranchName::try_parse(other_branch.to_string())
            .map_err(|_| GitletError::NotFound(Missing::BranchName))?;
        let other_oid = self
            .refs()
            .read_branch(&other_branch)?
            .ok_or(GitletError::NotFound(Missing::BranchName))?;

        let head = self.head()?;
        if head.branch == other_branch {
            return Err(GitletError::SelfMerge.into());
        }

        let split_oid = self
            .split_point_finder()
            .split_point(&head.oid, &other_oid)?;

        if split_oid.as_ref() == Some(&other_oid) {
            return Err(GitletError::AlreadyMerged.into());
        }

        if split_oid.as_ref() == Some(&head.oid) {
            self.move_to_commit(&other_oid)?;
            let head = self.refs().advance_head(other_oid)?;
            self.regenerate_branch_log(&head.branch, &head.oid)?;
            info!(branch = %head.branch, oid = %head.oid, "fast-forwarded");

            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(());
        }

        let current_tree = self.database().load_commit(&head.oid)?.tree().clone();
        let other_tree = self.database().load_commit(&other_oid)?.tree().clone();
        let base_tree = match &split_oid {
            Some(oid) => self.database().load_commit(oid)?.tree().clone(),
            None => {
                warn!(%other_branch, "histories share no commit, merging against an empty tree");
                Tree::new()
            }
        };

        let merge = TreeMerge::compute(&current_tree, &other_tree, &base_tree, |oid| {
            self.database().load_content(oid)
        })?;
        if merge.tree == current_tree {
            return Err(GitletError::NothingToCommit.into());
        }

        // scanned against the merge plan, so ancestry and no-op refusals are reported first
        let migration = Migration::for_merge(&current_tree, &merge.tree);
        migration.check_untracked(&current_tree, &self.staging(), self.workspace())?;

        for content in merge.conflicts.values() {
            self.database().store(&Blob::new(content.clone()))?;
        }
        self.workspace()
            .apply_migration(&migration, |oid| self.database().load_content(oid))?;

        let has_conflicts = merge.has_conflicts();
        let message = format!("Merged {other_branch} into {}.", head.branch);
        let merged = self.write_commit(vec![head.oid, other_oid], merge.tree, &message)?;
        info!(
            branch = %merged.branch,
            oid = %merged.oid,
            conflicts = merge.conflicts.len(),
            "merged"
        );

        if has_conflicts {
            writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
        }

        Ok(())
    }
}
