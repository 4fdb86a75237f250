//! Branch names
//!
//! Branch names become file paths under `refs/heads` and `logs/refs/heads`, so
//! they are validated with the same rules git applies to ref names.

pub mod branch_name;

/// Matches any name git would refuse as a ref name
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";
