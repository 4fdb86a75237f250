//! User-facing failures
//!
//! Every failure a command can report to the user is a variant of [`GitletError`].
//! The `Display` text of each variant is the single line printed by the binary.
//! Errors travel through `anyhow::Error`, so callers recover the kind with
//! `err.downcast_ref::<GitletError>()`.

use thiserror::Error;

/// What could not be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A file in the working directory
    File,
    /// A file inside a commit's tree
    FileInCommit,
    /// A commit (full digest or prefix)
    Commit,
    /// A commit whose message matches a search
    CommitWithMessage,
    /// A branch addressed by checkout
    Branch,
    /// A branch addressed by name (merge, rm-branch)
    BranchName,
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Missing::File => "File does not exist.",
            Missing::FileInCommit => "File does not exist in that commit.",
            Missing::Commit => "No commit with that id exists.",
            Missing::CommitWithMessage => "Found no commit with that message.",
            Missing::Branch => "No such branch exists.",
            Missing::BranchName => "A branch with that name does not exist.",
        };

        write!(f, "{message}")
    }
}

/// What already exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existing {
    Repository,
    Branch,
}

impl std::fmt::Display for Existing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Existing::Repository => {
                "A Gitlet version-control system already exists in the current directory."
            }
            Existing::Branch => "A branch with that name already exists.",
        };

        write!(f, "{message}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("Incorrect operands.")]
    InvalidArgumentCount,
    #[error("{0}")]
    NotFound(Missing),
    #[error("Ambiguous object id prefix {0}.")]
    Ambiguous(String),
    #[error("{0}")]
    AlreadyExists(Existing),
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No need to checkout the current branch.")]
    NoOp,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict,
    #[error("Given branch is an ancestor of the current branch.")]
    AlreadyMerged,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Please enter a commit message.")]
    BadCommitMessage,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrent,
    #[error("Remote command {0} is not supported.")]
    Unsupported(String),
}

impl GitletError {
    /// Recover a domain error from an `anyhow` chain, if there is one
    pub fn find(err: &anyhow::Error) -> Option<&GitletError> {
        err.chain().find_map(|cause| cause.downcast_ref::<GitletError>())
    }
}
