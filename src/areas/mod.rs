//! Persistent repository areas
//!
//! - `database`: content-addressed store for blobs and commits
//! - `logs`: per-branch and global commit logs
//! - `refs`: branches and the HEAD record
//! - `repository`: the context tying every area together
//! - `staging`: pending additions and removals for the next commit
//! - `workspace`: working directory file system operations

pub mod database;
pub mod logs;
pub mod refs;
pub mod repository;
pub mod staging;
pub mod workspace;
