/// How an untracked working file would be lost by a checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// The target writes different content at the file's path
    UntrackedOverwritten,
    /// The file sits where the target needs a directory, or inside a
    /// directory the target replaces with a file
    UntrackedRemoved,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::UntrackedOverwritten => write!(f, "would be overwritten"),
            ConflictType::UntrackedRemoved => write!(f, "would be removed"),
        }
    }
}
