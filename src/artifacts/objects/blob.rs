//! Blob object
//!
//! Blobs store file content as raw bytes. Names live in commit trees.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Immutable file content, identified by the SHA-1 of its serialized form
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl From<&[u8]> for Blob {
    fn from(value: &[u8]) -> Self {
        Blob::new(Bytes::copy_from_slice(value))
    }
}

impl Packable for Blob {
    fn serialize_body(&self) -> anyhow::Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_size_header() {
        let blob = Blob::from(&b"wug"[..]);

        assert_eq!(blob.serialize().unwrap(), Bytes::from_static(b"blob 3\0wug"));
    }

    #[test]
    fn identical_content_has_identical_ids() {
        let first = Blob::from(&b"same"[..]);
        let second = Blob::from(&b"same"[..]);
        let other = Blob::from(&b"different"[..]);

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_ne!(first.object_id().unwrap(), other.object_id().unwrap());
    }
}
