//! Content store
//!
//! Blobs and commits live under `.gitlet/objects`, sharded by the first two hex
//! characters of their id and compressed with zlib. Storing is idempotent: an
//! object whose file already exists is never rewritten.

use crate::artifacts::core::error::{GitletError, Missing};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object and return its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, object_content)?;
        debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Store raw file content as a blob
    pub fn store_content(&self, content: &[u8]) -> anyhow::Result<ObjectId> {
        self.store(&Blob::from(content))
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw content of a stored blob
    pub fn load_content(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(blob.into_content()),
            ObjectBox::Commit(_) => anyhow::bail!("object {object_id} is not a blob"),
        }
    }

    /// Load a commit; fails with `NotFound(Commit)` when absent or not a commit
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        if !self.exists(object_id) {
            return Err(GitletError::NotFound(Missing::Commit).into());
        }

        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| GitletError::NotFound(Missing::Commit).into())
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Resolve a full id or an abbreviated one (at least 2 hex characters)
    ///
    /// When `kind` is given, only objects of that type are candidates. Fails with
    /// `NotFound(Commit)` when nothing matches and `Ambiguous` when more than one
    /// object does.
    pub fn resolve_prefix(
        &self,
        prefix: &str,
        kind: Option<ObjectType>,
    ) -> anyhow::Result<ObjectId> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Err(GitletError::NotFound(Missing::Commit).into());
        }
        let prefix = prefix.to_ascii_lowercase();

        let mut matches = self.find_objects_by_prefix(&prefix)?;
        if let Some(kind) = kind {
            let mut filtered = Vec::with_capacity(matches.len());
            for oid in matches {
                if self.object_type(&oid)? == kind {
                    filtered.push(oid);
                }
            }
            matches = filtered;
        }

        debug!(%prefix, candidates = matches.len(), "resolved object prefix");
        match matches.len() {
            0 => Err(GitletError::NotFound(Missing::Commit).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(GitletError::Ambiguous(prefix).into()),
        }
    }

    /// All stored ids starting with `prefix`; only the prefix's shard is scanned
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        if prefix.len() < 2 || prefix.len() > OBJECT_ID_LENGTH {
            return Ok(matches);
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(matches);
        }

        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list objects in {}", dir_path.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            // skips temp files left behind by interrupted writes
            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.to_path());
        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, _) = ObjectType::parse_header(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path)
            .with_context(|| format!("Unable to read object file {}", object_path.display()))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&object_content).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // rename makes the object appear atomically
        std::fs::rename(&temp_object_path, object_path)
            .with_context(|| format!("Unable to rename object file to {}", object_path.display()))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Commit;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    proptest! {
        #[test]
        fn stored_content_loads_back(content in prop::collection::vec(any::<u8>(), 0..512)) {
            let dir = TempDir::new().unwrap();
            let database = database(&dir);

            let oid = database.store_content(&content).unwrap();

            prop_assert_eq!(database.load_content(&oid).unwrap().to_vec(), content);
        }
    }

    #[rstest]
    fn storing_twice_is_a_no_op(store_dir: TempDir) {
        let database = database(&store_dir);

        let first = database.store_content(b"wug").unwrap();
        let second = database.store_content(b"wug").unwrap();

        assert_eq!(first, second);
        let shard = database.objects_path().join(&first.as_ref()[..2]);
        assert_eq!(std::fs::read_dir(shard).unwrap().count(), 1);
    }

    #[rstest]
    fn commits_load_back(store_dir: TempDir) {
        let database = database(&store_dir);
        let root = Commit::root("master");

        let oid = database.store(&root).unwrap();

        assert_eq!(database.load_commit(&oid).unwrap(), root);
        assert_eq!(database.object_type(&oid).unwrap(), ObjectType::Commit);
    }

    #[rstest]
    fn loading_a_blob_as_commit_is_not_found(store_dir: TempDir) {
        let database = database(&store_dir);
        let oid = database.store_content(b"wug").unwrap();

        let err = database.load_commit(&oid).unwrap_err();

        assert_eq!(
            GitletError::find(&err),
            Some(&GitletError::NotFound(Missing::Commit))
        );
    }

    #[rstest]
    fn resolves_unique_prefixes(store_dir: TempDir) {
        let database = database(&store_dir);
        let oid = database.store_content(b"wug").unwrap();

        let resolved = database.resolve_prefix(&oid.as_ref()[..6], None).unwrap();
        let uppercase = oid.as_ref()[..8].to_ascii_uppercase();

        assert_eq!(resolved, oid);
        assert_eq!(database.resolve_prefix(&uppercase, None).unwrap(), oid);
    }

    #[rstest]
    fn unknown_or_short_prefixes_are_not_found(store_dir: TempDir) {
        let database = database(&store_dir);
        let oid = database.store_content(b"wug").unwrap();

        for prefix in [&oid.as_ref()[..1], "zz", "0000000"] {
            let err = database.resolve_prefix(prefix, None).unwrap_err();
            assert_eq!(
                GitletError::find(&err),
                Some(&GitletError::NotFound(Missing::Commit))
            );
        }
    }

    #[rstest]
    fn shared_prefixes_are_ambiguous(store_dir: TempDir) {
        let database = database(&store_dir);

        // find two contents whose ids share the first two characters
        let mut seen = std::collections::HashMap::new();
        let (first, second) = (0u32..)
            .find_map(|n| {
                let oid = database.store_content(n.to_string().as_bytes()).unwrap();
                let shard = oid.as_ref()[..2].to_string();
                seen.insert(shard, oid.clone()).map(|previous| (previous, oid))
            })
            .unwrap();

        let err = database.resolve_prefix(&first.as_ref()[..2], None).unwrap_err();

        assert!(matches!(GitletError::find(&err), Some(GitletError::Ambiguous(_))));
        assert_eq!(database.resolve_prefix(first.as_ref(), None).unwrap(), first);
        assert_eq!(database.resolve_prefix(second.as_ref(), None).unwrap(), second);
    }

    #[rstest]
    fn type_filter_skips_other_kinds(store_dir: TempDir) {
        let database = database(&store_dir);
        let blob = database.store_content(b"wug").unwrap();

        let err = database
            .resolve_prefix(blob.as_ref(), Some(ObjectType::Commit))
            .unwrap_err();

        assert_eq!(
            GitletError::find(&err),
            Some(&GitletError::NotFound(Missing::Commit))
        );
    }
}
