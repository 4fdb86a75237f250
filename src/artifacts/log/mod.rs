//! Commit log rendering
//!
//! Every branch keeps a newest-first text log of the commits made on it, and
//! the repository keeps one global log of every commit ever made. Entries are
//! rendered once, when the commit is recorded, and printed verbatim by `log`
//! and `global-log`.

pub mod log_entry;
