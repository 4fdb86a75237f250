use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;

/// A pending change for one filename
///
/// A filename maps to at most one change, so it can never be staged for
/// addition and removal at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    /// New or changed content to record in the next commit
    Add(ObjectId),
    /// Removal from the next commit, with a snapshot of the removed version
    Remove(ObjectId),
}

impl StagedChange {
    pub fn tag(&self) -> u8 {
        match self {
            StagedChange::Add(_) => b'A',
            StagedChange::Remove(_) => b'R',
        }
    }

    pub fn from_tag(tag: u8, oid: ObjectId) -> anyhow::Result<Self> {
        match tag {
            b'A' => Ok(StagedChange::Add(oid)),
            b'R' => Ok(StagedChange::Remove(oid)),
            _ => Err(anyhow!("Invalid staging entry tag {tag:#04x}")),
        }
    }

    pub fn oid(&self) -> &ObjectId {
        match self {
            StagedChange::Add(oid) | StagedChange::Remove(oid) => oid,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, StagedChange::Add(_))
    }
}
