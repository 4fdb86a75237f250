//! Staging file format
//!
//! ```text
//! Header:
//!   - Signature: "GSTG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries, sorted by filename:
//!   - Tag: b'A' (staged for addition) or b'R' (staged for removal)
//!   - Filename (u32 length + UTF-8)
//!   - Blob id (20 bytes): the new content, or the snapshot of the removed version
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod staged_change;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Magic signature identifying staging files
pub const SIGNATURE: &[u8; 4] = b"GSTG";

/// Staging file format version
pub const VERSION: u32 = 1;
