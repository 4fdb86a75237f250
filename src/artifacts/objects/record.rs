//! Length-prefixed record encoding
//!
//! Commit bodies, the HEAD record and the staging file are stored as sequences
//! of explicit fields instead of whitespace-delimited text, so names may
//! contain spaces or newlines. Integers are big-endian; strings are a `u32`
//! byte length followed by UTF-8 bytes.

use anyhow::Context;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Upper bound for a single string field, guards against corrupt length prefixes
const MAX_FIELD_LENGTH: u32 = 64 * 1024 * 1024;

pub trait RecordWrite: Write {
    fn write_str_field(&mut self, value: &str) -> anyhow::Result<()> {
        let length = u32::try_from(value.len()).context("field too long to encode")?;
        self.write_u32::<BigEndian>(length)?;
        self.write_all(value.as_bytes())?;
        Ok(())
    }

    fn write_signature(&mut self, signature: &[u8; 4]) -> anyhow::Result<()> {
        self.write_all(signature)?;
        Ok(())
    }
}

impl<W: Write + ?Sized> RecordWrite for W {}

pub trait RecordRead: Read {
    fn read_str_field(&mut self) -> anyhow::Result<String> {
        let length = self.read_u32::<BigEndian>()?;
        if length > MAX_FIELD_LENGTH {
            anyhow::bail!("record field length {length} exceeds limit");
        }

        let mut bytes = vec![0; length as usize];
        self.read_exact(&mut bytes)
            .context("record field is truncated")?;

        String::from_utf8(bytes).context("record field is not valid UTF-8")
    }

    fn expect_signature(&mut self, signature: &[u8; 4]) -> anyhow::Result<()> {
        let mut actual = [0u8; 4];
        self.read_exact(&mut actual)?;

        if &actual != signature {
            anyhow::bail!(
                "invalid record signature: expected {:?}, got {:?}",
                String::from_utf8_lossy(signature),
                String::from_utf8_lossy(&actual)
            );
        }

        Ok(())
    }
}

impl<R: Read + ?Sized> RecordRead for R {}
