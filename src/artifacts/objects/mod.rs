//! Stored object types
//!
//! Everything in the content store is an object identified by the SHA-1 hash of
//! its serialized form. There are two kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Commit**: snapshot with metadata (parents, tree, message, timestamp, branch)
//!
//! The tree of a commit is not a separate object; it is embedded in the commit
//! body. All objects share the framing `<type> <size>\0<body>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod record;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated hash shown in `Merge:` log lines
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
