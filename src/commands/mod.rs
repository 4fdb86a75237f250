//! Command implementations
//!
//! Every command is an `impl Repository` block in its own file:
//!
//! - `porcelain`: the version-control workflow (init, add, commit, merge, ...)
//! - `remote`: remote-repository commands, which are recognised but unsupported

pub mod porcelain;
pub mod remote;
