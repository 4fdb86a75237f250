//! Data structures and algorithms
//!
//! - `branch`: branch-name validation
//! - `checkout`: migration planning and untracked-file conflict detection
//! - `core`: errors, configuration and the pager writer
//! - `log`: rendering and parsing of commit log entries
//! - `merge`: split-point search and three-way resolution
//! - `objects`: object ids, blobs, trees and commits
//! - `staging`: staging file building blocks
//! - `status`: the status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod staging;
pub mod status;
