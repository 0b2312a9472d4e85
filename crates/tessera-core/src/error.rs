// crates/tessera-core/src/error.rs

use thiserror::Error;

use crate::identity::AccountId;

/// Ledger-wide error types for Tessera.
///
/// Every variant aborts the operation that produced it. No operation leaves a
/// partial state change behind when it returns one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TesseraError {
    /// Zero, non-positive, or out-of-range amount argument.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Caller lacks the administrative capability for a restricted operation.
    #[error("Unauthorized: account {caller} is not the administrative identity")]
    Unauthorized { caller: AccountId },

    /// Withdrawal attempted before the lock period ended.
    #[error("Lock active: {remaining_secs}s remaining (unlocks at {unlock_at})")]
    LockActive { remaining_secs: u64, unlock_at: u64 },

    /// The debited account cannot cover the transfer.
    #[error("Insufficient balance: account {account} needs {needed} grains but holds {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    /// The staking custody account cannot cover a payout.
    #[error("Insufficient custody funds: payout of {needed} grains but custody holds {available}")]
    InsufficientCustodyFunds { needed: u128, available: u128 },

    /// The fungible ledger refused the transfer (e.g. missing allowance).
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),

    /// Faucet reused before its cooldown elapsed.
    #[error("Cooldown active: faucet available again in {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },

    /// A timestamp earlier than one already observed was supplied.
    #[error("Clock regression: now {now} is before last observed {last_seen}")]
    ClockRegression { now: u64, last_seen: u64 },

    /// The configured staking policy forbids the operation.
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// Integer overflow in ledger arithmetic.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Persistent state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid or unreadable configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TesseraError {
    fn from(e: serde_json::Error) -> Self {
        TesseraError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for TesseraError {
    fn from(e: std::io::Error) -> Self {
        TesseraError::Storage(e.to_string())
    }
}
