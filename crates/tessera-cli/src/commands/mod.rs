// crates/tessera-cli/src/commands/mod.rs
//
// Command module declarations for the Tessera CLI, plus the context every
// command runs with.

pub mod clock;
pub mod credential;
pub mod init;
pub mod stake;
pub mod status;
pub mod token;
pub mod wallet;

use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use crate::accounts;
use crate::config::CliConfig;
use crate::output::OutputFormat;
use crate::store::{self, LedgerState};
use tessera_core::error::TesseraError;
use tessera_core::identity::AccountId;
use tessera_economics::Tes;

/// Resolved global options shared by all subcommands.
pub struct Context {
    pub config: CliConfig,
    pub state_path: PathBuf,
    pub format: OutputFormat,
}

impl Context {
    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir()
    }

    /// Resolve an account argument (hex id, wallet name, "custody", or label).
    pub fn account(&self, arg: &str) -> Result<AccountId, TesseraError> {
        accounts::resolve(arg, &self.data_dir())
    }

    /// The configured admin account.
    pub fn admin(&self) -> Result<AccountId, TesseraError> {
        self.account(&self.config.admin)
    }

    pub async fn load(&self) -> Result<LedgerState, TesseraError> {
        store::load(&self.state_path).await
    }

    pub async fn save(&self, state: &LedgerState) -> Result<(), TesseraError> {
        store::save(&self.state_path, state).await
    }
}

/// Parse a decimal TES amount argument into grains.
pub fn parse_amount(value: &str) -> Result<u128, TesseraError> {
    value.parse::<Tes>().map(|t| t.grains)
}

/// Render a unix timestamp for human output.
pub fn format_time(ts: u64) -> String {
    match i64::try_from(ts).ok().and_then(|s| Utc.timestamp_opt(s, 0).single()) {
        Some(dt) => format!("{} ({})", ts, dt.format("%Y-%m-%d %H:%M:%S UTC")),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5").unwrap(), 3 * tessera_economics::GRAIN_PER_TES / 2);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0 (1970-01-01 00:00:00 UTC)");
        assert_eq!(format_time(u64::MAX), u64::MAX.to_string());
    }
}
