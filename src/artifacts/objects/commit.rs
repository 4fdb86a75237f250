//! Commit object
//!
//! Commits are immutable snapshots of the tracked file set. They contain:
//! - Zero parents (the root commit only), one parent, or two parents (merges)
//! - The full tree of tracked files
//! - The commit message, timestamp and the branch it was authored on
//!
//! ## Format
//!
//! On disk the body is a length-prefixed record (see `record`):
//! ```text
//! commit <size>\0
//! u8 parent count, then 20 raw bytes per parent
//! i64 timestamp seconds, i32 UTC offset seconds
//! str branch
//! str message
//! u32 entry count, then per entry: str name, 20 raw bytes blob id
//! ```

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::record::{RecordRead, RecordWrite};
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::io::BufRead;

/// Message of the root commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Human-readable timestamp format used in logs
const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Slim representation of a commit
///
/// Contains only what graph traversal needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for the root commit, two entries for merge commits
    parents: Vec<ObjectId>,
    tree: Tree,
    message: String,
    timestamp: DateTime<FixedOffset>,
    /// Branch the commit was authored on
    branch: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree: Tree,
        message: String,
        timestamp: DateTime<FixedOffset>,
        branch: String,
    ) -> Self {
        Commit {
            parents,
            tree,
            message,
            timestamp,
            branch,
        }
    }

    /// The parentless commit every history starts from
    pub fn root(branch: &str) -> Self {
        let epoch = FixedOffset::east_opt(0)
            .and_then(|utc| utc.timestamp_opt(0, 0).single())
            .unwrap_or_default();

        Commit::new(
            Vec::new(),
            Tree::new(),
            ROOT_COMMIT_MESSAGE.to_string(),
            epoch,
            branch.to_string(),
        )
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp like "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp,
        }
    }
}

impl Packable for Commit {
    fn serialize_body(&self) -> anyhow::Result<Bytes> {
        let mut body = Vec::new();

        let parent_count =
            u8::try_from(self.parents.len()).context("too many parents for a commit")?;
        body.write_u8(parent_count)?;
        for parent in &self.parents {
            parent.write_h40_to(&mut body)?;
        }

        body.write_i64::<BigEndian>(self.timestamp.timestamp())?;
        body.write_i32::<BigEndian>(self.timestamp.offset().local_minus_utc())?;
        body.write_str_field(&self.branch)?;
        body.write_str_field(&self.message)?;

        let entry_count = u32::try_from(self.tree.len()).context("tree too large")?;
        body.write_u32::<BigEndian>(entry_count)?;
        for (name, oid) in self.tree.iter() {
            body.write_str_field(name)?;
            oid.write_h40_to(&mut body)?;
        }

        Ok(Bytes::from(body))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let parent_count = reader
            .read_u8()
            .context("Invalid commit object: missing parent count")?;
        let parents = (0..parent_count)
            .map(|_| ObjectId::read_h40_from(&mut reader))
            .collect::<anyhow::Result<Vec<_>>>()
            .context("Invalid commit object: invalid parent id")?;

        let seconds = reader
            .read_i64::<BigEndian>()
            .context("Invalid commit object: missing timestamp")?;
        let offset = reader
            .read_i32::<BigEndian>()
            .context("Invalid commit object: missing timezone")?;
        let timestamp = FixedOffset::east_opt(offset)
            .and_then(|tz| tz.timestamp_opt(seconds, 0).single())
            .context("Invalid commit object: invalid timestamp")?;

        let branch = reader.read_str_field().context("Invalid commit object: branch")?;
        let message = reader.read_str_field().context("Invalid commit object: message")?;

        let entry_count = reader
            .read_u32::<BigEndian>()
            .context("Invalid commit object: missing entry count")?;
        let tree = (0..entry_count)
            .map(|_| {
                let name = reader.read_str_field()?;
                let oid = ObjectId::read_h40_from(&mut reader)?;
                Ok((name, oid))
            })
            .collect::<anyhow::Result<Tree>>()
            .context("Invalid commit object: invalid tree entry")?;

        Ok(Self::new(parents, tree, message, timestamp, branch))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
