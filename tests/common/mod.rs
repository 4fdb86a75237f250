#![allow(dead_code)]

pub mod command;
pub mod file;

/// Directory holding all repository state
pub const REPOSITORY_DIR: &str = ".gitlet";

/// Id of the root commit every repository starts from
pub fn root_commit_id(dir: &std::path::Path) -> String {
    let log = std::fs::read_to_string(dir.join(".gitlet/logs/HEAD"))
        .expect("Failed to read the global log");
    log_commit_ids(&log)
        .last()
        .cloned()
        .expect("Global log has no entries")
}

/// Commit ids in a rendered log, in log order
pub fn log_commit_ids(log: &str) -> Vec<String> {
    log.lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
