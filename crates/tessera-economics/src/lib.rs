// crates/tessera-economics/src/lib.rs
//
// tessera-economics: $TES token, credential registry, reward accrual, and the
// staking ledger state machine for Tessera.
//
// All monetary values are tracked in grains (the smallest unit of $TES).
// 1 TES = 1,000,000,000,000,000,000 grains (10^18).

pub mod credential;
pub mod deploy;
pub mod fungible;
pub mod rewards;
pub mod staking;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use credential::CertificateRegistry;
pub use deploy::{custody_account, deploy, DeployConfig, StandardLedger, CUSTODY_LABEL};
pub use fungible::{FaucetPolicy, TokenLedger, UNLIMITED_ALLOWANCE};
pub use rewards::{accrue, reward_for, Accrual, DEFAULT_APR_BPS, SECONDS_PER_YEAR};
pub use staking::{
    ClaimReceipt, CredentialIssuance, DepositReceipt, LockRenewal, RewardPayout, StakeRecord,
    StakeState, StakingLedger, StakingPolicy, WithdrawReceipt, CERTIFICATE_THRESHOLD,
    DEFAULT_LOCK_DURATION_SECS,
};
pub use token::{Grain, Tes, GRAIN_PER_TES};
