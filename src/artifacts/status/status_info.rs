use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::staging::staged_change::StagedChange;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

// Terminology:
// - staged files: files with new content staged for addition
// - removed files: files staged for removal
// - modified/deleted files: files the next commit would record differently
//   from the working copy, because the change was never staged
// - untracked files: working files neither tracked by HEAD nor staged for addition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub branches: Vec<BranchName>,
    pub current_branch: BranchName,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub unstaged: BTreeMap<String, WorkspaceChangeType>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn compute(
        branches: Vec<BranchName>,
        current_branch: BranchName,
        head_tree: &Tree,
        staging: &StagingArea,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        let staged = staging.additions().map(|(name, _)| name.clone()).collect();
        let removed = staging.removals().cloned().collect();

        let working_files = workspace.list_files()?.into_iter().collect::<BTreeSet<_>>();

        let mut unstaged = BTreeMap::new();
        for name in head_tree.names().cloned().chain(
            staging
                .additions()
                .map(|(name, _)| name.clone())
                .filter(|name| !head_tree.contains(name)),
        ) {
            let expected = match staging.get(&name) {
                Some(StagedChange::Remove(_)) => continue,
                Some(StagedChange::Add(oid)) => oid,
                None => match head_tree.get(&name) {
                    Some(oid) => oid,
                    None => continue,
                },
            };

            if !working_files.contains(&name) {
                unstaged.insert(name, WorkspaceChangeType::Deleted);
            } else if &workspace.parse_blob(&name)?.object_id()? != expected {
                unstaged.insert(name, WorkspaceChangeType::Modified);
            }
        }

        let untracked = working_files
            .into_iter()
            .filter(|name| {
                // a file staged for removal that reappears is untracked again
                match staging.get(name) {
                    Some(change) => !change.is_add(),
                    None => !head_tree.contains(name),
                }
            })
            .collect();

        Ok(StatusReport {
            branches,
            current_branch,
            staged,
            removed,
            unstaged,
            untracked,
        })
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for name in &self.staged {
            writeln!(f, "{}", name.green())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for name in &self.removed {
            writeln!(f, "{}", name.green())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (name, change) in &self.unstaged {
            writeln!(f, "{name} {change}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for name in &self.untracked {
            writeln!(f, "{}", name.red())?;
        }
        writeln!(f)
    }
}
