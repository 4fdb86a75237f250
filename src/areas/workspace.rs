use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// Name of the repository directory, never part of the working tree
pub const REPOSITORY_DIR: &str = ".gitlet";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical filename for a user-supplied path: relative, `/`-separated,
    /// without `.` components; `None` when it escapes the working directory
    pub fn normalize(name: &str) -> Option<String> {
        let mut parts = Vec::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }

        if parts.is_empty() || parts[0] == REPOSITORY_DIR {
            return None;
        }

        Some(parts.join("/"))
    }

    /// All regular files under the working directory, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !(entry.depth() == 1 && entry.file_name() == REPOSITORY_DIR));
        for entry in walker {
            let entry = entry.context("Unable to walk the working directory")?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = entry
                .path()
                .strip_prefix(&self.path)
                .ok()
                .and_then(|relative| Self::normalize(&relative.to_string_lossy()))
            {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.full_path(name).is_file()
    }

    pub fn dir_exists(&self, name: &str) -> bool {
        self.full_path(name).is_dir()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.full_path(name);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(name)?))
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.full_path(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {}", parent.display()))?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("Unable to write file {}", file_path.display()))?;
        trace!(file = name, bytes = content.len(), "wrote working file");

        Ok(())
    }

    /// Delete a working file if present, then prune directories it left empty
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.full_path(name);
        if !file_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&file_path)
            .with_context(|| format!("Unable to remove file {}", file_path.display()))?;
        trace!(file = name, "removed working file");

        self.prune_empty_parent_dirs(&file_path)
    }

    // Deletions run first so that directories they empty can make room for
    // files of the same name written afterwards.
    pub fn apply_migration(
        &self,
        migration: &Migration,
        load_content: impl Fn(&ObjectId) -> anyhow::Result<Bytes>,
    ) -> anyhow::Result<()> {
        for name in migration.paths(ActionType::Delete) {
            self.remove_file(name)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (name, oid) in migration.writes(action) {
                self.write_file(name, &load_content(oid)?)?;
            }
        }

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Unable to remove empty directory {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}
