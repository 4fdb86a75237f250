use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{BufRead, Write};

pub trait Packable {
    /// Serialize the object body (without the `<type> <size>\0` header)
    fn serialize_body(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Deserialize the object body; the header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Full on-disk form: `<type> <size>\0<body>`
    fn serialize(&self) -> Result<Bytes> {
        let body = self.serialize_body()?;

        let mut object_bytes = Vec::with_capacity(body.len() + 16);
        write!(object_bytes, "{} {}\0", self.object_type().as_str(), body.len())?;
        object_bytes.write_all(&body)?;

        Ok(Bytes::from(object_bytes))
    }

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        let mut hasher = Sha1::new();
        hasher.update(&content);

        let oid = hasher.finalize();
        ObjectId::try_parse(format!("{oid:x}"))
    }
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Commit(Box<Commit>),
}
