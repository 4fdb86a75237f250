//! Porcelain commands
//!
//! - `init`: create the repository layout and the root commit
//! - `add`, `rm`: stage files for addition or removal
//! - `commit`: record the staged changes
//! - `checkout`, `reset`: move the working directory to another snapshot
//! - `log`, `find`, `status`: inspect history and pending changes
//! - `branch`: create and delete branches
//! - `merge`: three-way merge of another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
