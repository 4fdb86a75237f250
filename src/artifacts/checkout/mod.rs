//! Checkout operations and untracked-file protection
//!
//! Switching the working directory to another commit's tree is planned as a
//! [`migration::Migration`], checked against untracked files, and only then
//! applied. Branch checkout, reset, fast-forward and merge all go through it.

pub mod conflict;
pub mod migration;
