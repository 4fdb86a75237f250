use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::fmt::{self, Display, Formatter};

/// Separator opening every entry of a commit log
pub const ENTRY_SEPARATOR: &str = "===";

const COMMIT_PREFIX: &str = "commit ";

/// One commit as it appears in a branch log or the global log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    oid: ObjectId,
    merge_parents: Option<(ObjectId, ObjectId)>,
    date: String,
    message: String,
}

impl LogEntry {
    pub fn new(oid: ObjectId, commit: &Commit) -> Self {
        let merge_parents = commit
            .parent()
            .zip(commit.merge_parent())
            .map(|(first, second)| (first.clone(), second.clone()));

        LogEntry {
            oid,
            merge_parents,
            date: commit.readable_timestamp(),
            message: commit.message().to_string(),
        }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{ENTRY_SEPARATOR}")?;
        writeln!(f, "{COMMIT_PREFIX}{}", self.oid)?;
        if let Some((first, second)) = &self.merge_parents {
            writeln!(
                f,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "{}", self.message)?;
        writeln!(f)
    }
}

/// Commit ids of the entries of a rendered log, in log order
///
/// Only a `commit` line directly after a separator opens an entry, so message
/// text cannot masquerade as one unless it reproduces both lines.
pub fn parse_commit_ids(log: &str) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    let mut after_separator = false;

    for line in log.lines() {
        if after_separator
            && let Some(hex) = line.strip_prefix(COMMIT_PREFIX)
            && let Ok(oid) = ObjectId::try_parse(hex.to_string())
        {
            ids.push(oid);
        }
        after_separator = line == ENTRY_SEPARATOR;
    }

    ids
}
