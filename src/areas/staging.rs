//! Staging area
//!
//! The pending-change buffer between the working directory and the next commit.
//! Each filename is either staged for addition (with the blob of its new
//! content) or staged for removal (with a snapshot of the version removed).
//!
//! The staging file is read once per command and written back only when it
//! changed; its integrity is guarded by a trailing SHA-1 checksum.

use crate::artifacts::core::error::GitletError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::record::{RecordRead, RecordWrite};
use crate::artifacts::staging::checksum::Checksum;
use crate::artifacts::staging::staged_change::StagedChange;
use crate::artifacts::staging::{SIGNATURE, VERSION};
use anyhow::{Context, anyhow};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;

/// Result of staging a file for addition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The content is new; its blob must be stored
    Staged,
    /// The content matches the current commit; nothing is staged for it
    Unchanged,
}

/// Result of staging a file for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Only a pending addition was dropped; the working file stays
    Unstaged,
    /// The file is staged for removal and must leave the working directory
    Removed,
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    path: Box<Path>,
    entries: BTreeMap<String, StagedChange>,
    changed: bool,
}

impl StagingArea {
    pub fn new(path: Box<Path>) -> Self {
        StagingArea {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the staging file from disk; a missing or empty file is an empty area
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut staging_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut staging_file, file_guard::Lock::Shared, 0, 1)?;
        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        let mut reader = Checksum::new(content.as_slice());
        reader
            .expect_signature(SIGNATURE)
            .context("Invalid staging file signature")?;

        let version = reader.read_u32::<BigEndian>()?;
        if version != VERSION {
            return Err(anyhow!("Unsupported staging file version: {version}"));
        }

        let entries_count = reader.read_u32::<BigEndian>()?;
        for _ in 0..entries_count {
            let tag = reader.read_u8()?;
            let name = reader.read_str_field()?;
            let oid = ObjectId::read_h40_from(&mut reader)?;

            self.entries.insert(name, StagedChange::from_tag(tag, oid)?);
        }

        reader.verify()
    }

    /// Persist the area if anything changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut writer = Checksum::new(Vec::new());
        writer.write_signature(SIGNATURE)?;
        writer.write_u32::<BigEndian>(VERSION)?;
        writer.write_u32::<BigEndian>(
            u32::try_from(self.entries.len()).context("too many staged files")?,
        )?;
        for (name, change) in &self.entries {
            writer.write_u8(change.tag())?;
            writer.write_str_field(name)?;
            change.oid().write_h40_to(&mut writer)?;
        }
        writer.write_checksum()?;
        let content = writer.into_inner();

        let mut staging_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open staging file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut staging_file, file_guard::Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(&content)?;

        self.changed = false;
        debug!(entries = self.entries.len(), "wrote staging area");

        Ok(())
    }

    /// Stage `name` with content `oid`, given the version `tracked` by the current commit
    pub fn stage_add(
        &mut self,
        name: &str,
        oid: ObjectId,
        tracked: Option<&ObjectId>,
    ) -> AddOutcome {
        if tracked == Some(&oid) {
            // re-adding the committed version drops any pending change, removals included
            if self.entries.remove(name).is_some() {
                self.changed = true;
            }
            return AddOutcome::Unchanged;
        }

        let change = StagedChange::Add(oid);
        if self.entries.get(name) != Some(&change) {
            self.entries.insert(name.to_string(), change);
            self.changed = true;
        }

        AddOutcome::Staged
    }

    /// Stage `name` for removal
    ///
    /// `snapshot` yields the blob of the version being removed and is only
    /// invoked when the file is tracked by the current commit.
    pub fn stage_remove(
        &mut self,
        name: &str,
        tracked: Option<&ObjectId>,
        snapshot: impl FnOnce() -> anyhow::Result<ObjectId>,
    ) -> anyhow::Result<RemoveOutcome> {
        let staged_for_add = self.entries.get(name).is_some_and(StagedChange::is_add);

        match tracked {
            None if !staged_for_add => Err(GitletError::NothingToRemove.into()),
            None => {
                self.entries.remove(name);
                self.changed = true;
                Ok(RemoveOutcome::Unstaged)
            }
            Some(_) => {
                let snapshot = snapshot()?;
                self.entries
                    .insert(name.to_string(), StagedChange::Remove(snapshot));
                self.changed = true;
                Ok(RemoveOutcome::Removed)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&StagedChange> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.changed = true;
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &StagedChange)> {
        self.entries.iter()
    }

    /// Filenames staged for addition with their blob ids, sorted
    pub fn additions(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter().filter_map(|(name, change)| match change {
            StagedChange::Add(oid) => Some((name, oid)),
            StagedChange::Remove(_) => None,
        })
    }

    /// Filenames staged for removal, sorted
    pub fn removals(&self) -> impl Iterator<Item = &String> {
        self.entries
            .iter()
            .filter(|(_, change)| !change.is_add())
            .map(|(name, _)| name)
    }
}
