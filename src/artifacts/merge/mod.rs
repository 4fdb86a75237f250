//! Merge algorithms
//!
//! - `split_point`: ancestor distances and the split point of two commits
//! - `resolution`: per-file three-way resolution and conflict markers

pub mod resolution;
pub mod split_point;
