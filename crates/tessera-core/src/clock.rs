// crates/tessera-core/src/clock.rs
//
// Time sources for the ledger. All timestamps are unix seconds.
//
// The ledger itself never reads a clock: operations take `now` explicitly.
// Callers obtain `now` from one of these and share a single instance across
// every component so that all of them observe the same, non-decreasing time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::TesseraError;

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    /// Current timestamp. Must never return a value smaller than a previous call.
    fn now(&self) -> u64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven clock for tests and simulations.
///
/// Clones share the same underlying time, so one handle can advance the clock
/// seen by every component holding another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at `start`.
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move the clock forward by `secs` and return the new time.
    ///
    /// # Errors
    /// Returns `TesseraError::Arithmetic` if the new time would overflow u64;
    /// the clock is left unchanged.
    pub fn advance(&self, secs: u64) -> Result<u64, TesseraError> {
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| now.checked_add(secs))
            .map_err(|now| {
                TesseraError::Arithmetic(format!("advancing clock at {} by {}s overflows", now, secs))
            })?;
        Ok(previous + secs)
    }

    /// Jump to an absolute time.
    ///
    /// # Errors
    /// Returns `TesseraError::ClockRegression` if `timestamp` is in the past.
    pub fn set(&self, timestamp: u64) -> Result<(), TesseraError> {
        let current = self.now.load(Ordering::SeqCst);
        if timestamp < current {
            return Err(TesseraError::ClockRegression {
                now: timestamp,
                last_seen: current,
            });
        }
        self.now.store(timestamp, Ordering::SeqCst);
        Ok(())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
