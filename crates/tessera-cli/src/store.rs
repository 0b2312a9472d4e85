// crates/tessera-cli/src/store.rs
//
// JSON state file holding the deployed ledger between CLI invocations.
//
// Writes go to a sibling temp file that is then renamed over the previous one, so
// an interrupted command never leaves a truncated state file behind.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ClockMode;
use tessera_core::clock::{Clock, ManualClock, SystemClock};
use tessera_core::error::TesseraError;
use tessera_economics::StandardLedger;

/// File name of the state file inside the data directory.
pub const STATE_FILE: &str = "state.json";

/// Format version written into every state file.
pub const STATE_VERSION: u32 = 1;

/// Everything the CLI persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub clock_mode: ClockMode,
    /// Current simulated time; only meaningful under `ClockMode::Manual`.
    pub manual_now: u64,
    pub ledger: StandardLedger,
}

impl LedgerState {
    pub fn new(ledger: StandardLedger, clock_mode: ClockMode, manual_now: u64) -> Self {
        Self {
            version: STATE_VERSION,
            created_at: Utc::now(),
            clock_mode,
            manual_now,
            ledger,
        }
    }

    /// Clock for the configured mode.
    pub fn clock(&self) -> Box<dyn Clock> {
        match self.clock_mode {
            ClockMode::System => Box::new(SystemClock),
            ClockMode::Manual => Box::new(ManualClock::new(self.manual_now)),
        }
    }

    /// The timestamp to use for the next ledger operation.
    pub fn now(&self) -> u64 {
        self.clock().now()
    }

    /// Move the simulated clock forward.
    ///
    /// # Errors
    /// Returns `TesseraError::Config` under the system clock and
    /// `TesseraError::Arithmetic` if the new time would overflow.
    pub fn advance(&mut self, secs: u64) -> Result<u64, TesseraError> {
        if self.clock_mode != ClockMode::Manual {
            return Err(TesseraError::Config(
                "clock advance requires clock = \"manual\"".to_string(),
            ));
        }
        let clock = ManualClock::new(self.manual_now);
        self.manual_now = clock.advance(secs)?;
        Ok(self.manual_now)
    }
}

/// Resolve the state file location: an explicit override or `<data_dir>/state.json`.
pub fn state_path(data_dir: &Path, override_path: Option<&str>) -> PathBuf {
    match override_path {
        Some(p) => crate::config::expand_tilde(p),
        None => data_dir.join(STATE_FILE),
    }
}

/// Read the state file.
///
/// # Errors
/// `NotFound` if the file does not exist (run `tessera init`), `Serialization`
/// if it is corrupt or from an unknown version.
pub async fn load(path: &Path) -> Result<LedgerState, TesseraError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TesseraError::NotFound(format!(
                "no ledger state at {} (run `tessera init`)",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let state: LedgerState = serde_json::from_slice(&bytes)?;
    if state.version != STATE_VERSION {
        return Err(TesseraError::Serialization(format!(
            "unsupported state version {} (expected {})",
            state.version, STATE_VERSION
        )));
    }
    Ok(state)
}

/// Write the state file atomically.
pub async fn save(path: &Path, state: &LedgerState) -> Result<(), TesseraError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let json = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    tracing::debug!("Saved ledger state to {}", path.display());
    Ok(())
}
