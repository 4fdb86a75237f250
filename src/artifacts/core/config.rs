//! Runtime configuration
//!
//! Configuration is read from the environment once, when the repository context
//! is built, and then passed around explicitly.

use anyhow::Context;
use chrono::{DateTime, FixedOffset};

/// Environment variable holding a fixed commit timestamp
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";
/// Environment variable disabling the pager for log output
pub const NO_PAGER_ENV: &str = "NO_PAGER";
/// Environment variable holding the tracing filter directives
pub const LOG_FILTER_ENV: &str = "GITLET_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Timestamp stamped on every new commit instead of the wall clock
    pub commit_date: Option<DateTime<FixedOffset>>,
    /// Never page log output
    pub no_pager: bool,
}

impl Config {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let commit_date = match std::env::var(COMMIT_DATE_ENV) {
            Ok(raw) => Some(
                Self::parse_date(&raw)
                    .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {raw}"))?,
            ),
            Err(_) => None,
        };
        let no_pager = std::env::var_os(NO_PAGER_ENV).is_some();

        Ok(Config {
            commit_date,
            no_pager,
        })
    }

    /// Accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`
    pub fn parse_date(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z"))
            .map_err(|e| anyhow::anyhow!("unable to parse date {raw}: {e}"))
    }

    /// The timestamp for a commit created now
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.commit_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }
}
