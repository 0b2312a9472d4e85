// crates/tessera-economics/src/staking.rs
//
// The staking ledger: per-account stake records, the lock-period state
// machine, lazy reward accrual, and coordination of the fungible ledger and
// credential registry.
//
// States per account:
//   Unstaked   (principal = 0)
//   Locked     (principal > 0, now <  lock_end_time)
//   Unlockable (principal > 0, now >= lock_end_time)
//
// Every mutating operation follows checks-effects-interactions:
//   1. all argument, lock, and collaborator preflight checks;
//   2. the updated record is written;
//   3. only then the fungible ledger / credential registry are called.
// If an interaction still fails, the record is restored and any completed
// interaction reversed, so a failed call leaves no trace.
//
// The ledger owns its collaborators and every operation takes `&mut self`, so
// a collaborator can never call back into a half-updated ledger.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::rewards::{self, DEFAULT_APR_BPS};
use crate::token::{Grain, Tes, GRAIN_PER_TES};
use tessera_core::error::TesseraError;
use tessera_core::identity::{AccountId, CredentialId};
use tessera_core::traits::{CredentialRegistry, FungibleLedger};

/// Default lock period after a deposit: 300 seconds.
pub const DEFAULT_LOCK_DURATION_SECS: u64 = 300;

/// Single-deposit amount that triggers credential issuance: 1,000,000 TES.
pub const CERTIFICATE_THRESHOLD: Grain = 1_000_000 * GRAIN_PER_TES;

/// What a further deposit does to an existing lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockRenewal {
    /// Every deposit restarts the lock for the entire principal.
    #[default]
    ResetOnDeposit,
    /// A deposit into a record that already holds principal leaves the lock unchanged.
    KeepExisting,
}

/// How often a qualifying deposit issues a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialIssuance {
    /// Every deposit at or above the threshold issues one credential.
    #[default]
    EveryQualifyingDeposit,
    /// An account receives at most one credential, ever.
    OncePerAccount,
}

/// How accrued reward leaves the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPayout {
    /// Reward is paid only together with principal on withdrawal.
    WithdrawOnly,
    /// Reward may also be claimed on its own at any time.
    #[default]
    ClaimAnytime,
}

/// Tunable parameters of the staking ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingPolicy {
    /// Seconds after a deposit during which principal cannot be withdrawn.
    pub lock_duration_secs: u64,
    /// Annual reward rate in basis points (800 = 8 %).
    pub apr_bps: u32,
    /// Minimum single deposit, in grains, that issues a credential.
    pub certificate_threshold: Grain,
    pub lock_renewal: LockRenewal,
    pub credential_issuance: CredentialIssuance,
    pub reward_payout: RewardPayout,
}

impl Default for StakingPolicy {
    fn default() -> Self {
        Self {
            lock_duration_secs: DEFAULT_LOCK_DURATION_SECS,
            apr_bps: DEFAULT_APR_BPS,
            certificate_threshold: CERTIFICATE_THRESHOLD,
            lock_renewal: LockRenewal::default(),
            credential_issuance: CredentialIssuance::default(),
            reward_payout: RewardPayout::default(),
        }
    }
}

impl StakingPolicy {
    /// Reject parameter combinations the ledger cannot honour.
    pub fn validate(&self) -> Result<(), TesseraError> {
        if self.certificate_threshold == 0 {
            return Err(TesseraError::Config(
                "certificate_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stake bookkeeping for one account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Grains currently locked.
    pub principal: Grain,
    /// Timestamp of the most recent deposit that set the lock.
    pub deposit_time: u64,
    /// Principal cannot be withdrawn before this instant.
    pub lock_end_time: u64,
    /// Reward has been accounted up to this timestamp.
    pub last_claim_time: u64,
    /// Reward computed but not yet paid out, in grains.
    pub accrued_reward: Grain,
    /// Sub-grain accrual remainder carried into the next accrual step.
    pub reward_carry: u128,
    /// Credentials this record has triggered.
    pub credentials_issued: u64,
}

impl StakeRecord {
    pub fn state(&self, now: u64) -> StakeState {
        if self.principal == 0 {
            StakeState::Unstaked
        } else if now < self.lock_end_time {
            StakeState::Locked
        } else {
            StakeState::Unlockable
        }
    }
}

/// Lock-period state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeState {
    Unstaked,
    Locked,
    Unlockable,
}

impl fmt::Display for StakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeState::Unstaked => write!(f, "Unstaked"),
            StakeState::Locked => write!(f, "Locked"),
            StakeState::Unlockable => write!(f, "Unlockable"),
        }
    }
}

/// Outcome of a successful deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub account: AccountId,
    pub amount: Grain,
    /// Principal after the deposit.
    pub principal: Grain,
    pub lock_end_time: u64,
    /// Credential issued by this deposit, if any.
    pub credential: Option<CredentialId>,
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    pub account: AccountId,
    pub principal_paid: Grain,
    pub reward_paid: Grain,
    pub remaining_principal: Grain,
}

/// Outcome of a successful reward claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub account: AccountId,
    pub reward_paid: Grain,
}

/// The staking ledger.
///
/// `F` is the fungible ledger holding balances, `R` the credential registry.
/// `custody` is the ledger's own account on `F` (holding deposited principal
/// and the reward pool) and must be the administrative identity of `R`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingLedger<F, R> {
    custody: AccountId,
    policy: StakingPolicy,
    records: HashMap<AccountId, StakeRecord>,
    /// Latest timestamp accepted by a successful operation.
    last_timestamp: u64,
    tokens: F,
    credentials: R,
}

impl<F: FungibleLedger, R: CredentialRegistry> StakingLedger<F, R> {
    /// Create a ledger with no stake records.
    pub fn new(custody: AccountId, policy: StakingPolicy, tokens: F, credentials: R) -> Self {
        Self {
            custody,
            policy,
            records: HashMap::new(),
            last_timestamp: 0,
            tokens,
            credentials,
        }
    }

    /// The ledger's custody account on the fungible ledger.
    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    pub fn policy(&self) -> &StakingPolicy {
        &self.policy
    }

    pub fn tokens(&self) -> &F {
        &self.tokens
    }

    /// Mutable access to the fungible ledger for balance operations outside
    /// staking (faucet, transfers, approvals).
    pub fn tokens_mut(&mut self) -> &mut F {
        &mut self.tokens
    }

    pub fn credentials(&self) -> &R {
        &self.credentials
    }

    /// Latest timestamp accepted by a successful mutating operation.
    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    /// The stake record for `account`; zero-valued if it was never referenced.
    pub fn record(&self, account: &AccountId) -> StakeRecord {
        self.records.get(account).cloned().unwrap_or_default()
    }

    pub fn state(&self, account: &AccountId, now: u64) -> StakeState {
        self.record(account).state(now)
    }

    /// All accounts that have ever been referenced, with their records.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &StakeRecord)> {
        self.records.iter()
    }

    /// Sum of principal across all records.
    pub fn total_principal(&self) -> Grain {
        self.records.values().map(|r| r.principal).sum()
    }

    /// Custody funds not owed to stakers as principal, available for rewards.
    pub fn reward_pool(&self) -> Grain {
        self.tokens
            .balance_of(&self.custody)
            .saturating_sub(self.total_principal())
    }

    /// Deposit `amount` grains from `account` into stake.
    ///
    /// Accrues pending reward on the pre-deposit principal, pulls `amount`
    /// from the account (which must have approved the custody account), adds
    /// it to principal, sets the lock per `LockRenewal`, and issues a
    /// credential if `amount` reaches the certificate threshold.
    ///
    /// # Errors
    /// `InvalidAmount`, `ClockRegression`, `InsufficientBalance`,
    /// `TransferRejected`, `Unauthorized` (custody is not the registry admin),
    /// or `Arithmetic`. State is unchanged on any error, with one exception: if
    /// issuance fails and the refund also fails, the deposit is kept on the
    /// record and `TransferRejected` says so.
    pub fn deposit(
        &mut self,
        account: &AccountId,
        amount: Grain,
        now: u64,
    ) -> Result<DepositReceipt, TesseraError> {
        if amount == 0 {
            return Err(TesseraError::InvalidAmount(
                "deposit amount must be greater than zero".to_string(),
            ));
        }
        self.check_clock(now)?;

        let custody = self.custody;
        let previous = self.records.get(account).cloned();
        let before = previous.clone().unwrap_or_default();

        let mut updated = before.clone();
        self.accrue_into(&mut updated, now)?;
        self.tokens.check_transfer_in(account, &custody, amount)?;
        updated.principal = updated.principal.checked_add(amount).ok_or_else(|| {
            TesseraError::Arithmetic("principal overflow".to_string())
        })?;

        let keep_lock =
            self.policy.lock_renewal == LockRenewal::KeepExisting && before.principal > 0;
        if !keep_lock {
            updated.deposit_time = now;
            updated.lock_end_time = now
                .checked_add(self.policy.lock_duration_secs)
                .ok_or_else(|| TesseraError::Arithmetic("lock end overflow".to_string()))?;
        }

        let qualifies = amount >= self.policy.certificate_threshold
            && match self.policy.credential_issuance {
                CredentialIssuance::EveryQualifyingDeposit => true,
                CredentialIssuance::OncePerAccount => before.credentials_issued == 0,
            };
        if qualifies {
            self.credentials.check_issue(&custody)?;
            updated.credentials_issued += 1;
        }

        // Effects.
        let previous_timestamp = self.last_timestamp;
        self.records.insert(*account, updated.clone());
        self.last_timestamp = now;

        // Interactions.
        if let Err(e) = self.tokens.transfer_in(account, &custody, amount) {
            self.rollback(account, previous, previous_timestamp);
            return Err(e);
        }

        let credential = if qualifies {
            match self.credentials.issue(&custody, account) {
                Ok(id) => Some(id),
                Err(e) => {
                    if let Err(refund) =
                        self.tokens.reverse_transfer_in(account, &custody, amount)
                    {
                        // The funds stay in custody, so the deposit stays on the record.
                        if let Some(record) = self.records.get_mut(account) {
                            record.credentials_issued = record.credentials_issued.saturating_sub(1);
                        }
                        error!(
                            account = %account.short(),
                            error = %refund,
                            "Refund after failed credential issuance did not complete"
                        );
                        return Err(TesseraError::TransferRejected(format!(
                            "credential issuance failed ({}) and the deposit could not be refunded ({}); the deposit was kept",
                            e, refund
                        )));
                    }
                    self.rollback(account, previous, previous_timestamp);
                    return Err(e);
                }
            }
        } else {
            None
        };

        info!(
            account = %account.short(),
            amount = %Tes::from_grains(amount),
            principal = %Tes::from_grains(updated.principal),
            lock_end = updated.lock_end_time,
            credential = ?credential.map(|c| c.0),
            "Deposit"
        );

        Ok(DepositReceipt {
            account: *account,
            amount,
            principal: updated.principal,
            lock_end_time: updated.lock_end_time,
            credential,
        })
    }

    /// Withdraw `amount` grains of principal together with all accrued reward.
    ///
    /// # Errors
    /// `InvalidAmount` for zero or more than the principal, `LockActive`
    /// before the lock ends (regardless of amount), `ClockRegression`,
    /// `InsufficientCustodyFunds` (also when the reward pool cannot cover the
    /// reward), or `Arithmetic`. State is unchanged on any error.
    pub fn withdraw(
        &mut self,
        account: &AccountId,
        amount: Grain,
        now: u64,
    ) -> Result<WithdrawReceipt, TesseraError> {
        if amount == 0 {
            return Err(TesseraError::InvalidAmount(
                "withdraw amount must be greater than zero".to_string(),
            ));
        }
        self.check_clock(now)?;

        let custody = self.custody;
        let previous = self.records.get(account).cloned();
        let before = previous.clone().unwrap_or_default();

        if now < before.lock_end_time {
            return Err(TesseraError::LockActive {
                remaining_secs: before.lock_end_time - now,
                unlock_at: before.lock_end_time,
            });
        }
        if amount > before.principal {
            return Err(TesseraError::InvalidAmount(format!(
                "withdraw of {} exceeds principal of {}",
                Tes::from_grains(amount),
                Tes::from_grains(before.principal)
            )));
        }

        let mut updated = before.clone();
        self.accrue_into(&mut updated, now)?;
        let reward = updated.accrued_reward;
        let payout = amount
            .checked_add(reward)
            .ok_or_else(|| TesseraError::Arithmetic("payout overflow".to_string()))?;
        self.check_reward_pool(reward)?;
        self.tokens.check_transfer_out(&custody, payout)?;

        updated.principal -= amount;
        updated.accrued_reward = 0;
        if updated.principal == 0 {
            updated = StakeRecord {
                credentials_issued: updated.credentials_issued,
                ..StakeRecord::default()
            };
            updated.last_claim_time = now;
        }

        // Effects.
        let previous_timestamp = self.last_timestamp;
        self.records.insert(*account, updated.clone());
        self.last_timestamp = now;

        // Interactions.
        if let Err(e) = self.tokens.transfer_out(&custody, account, payout) {
            self.rollback(account, previous, previous_timestamp);
            return Err(e);
        }

        info!(
            account = %account.short(),
            principal_paid = %Tes::from_grains(amount),
            reward_paid = %Tes::from_grains(reward),
            remaining = %Tes::from_grains(updated.principal),
            "Withdraw"
        );

        Ok(WithdrawReceipt {
            account: *account,
            principal_paid: amount,
            reward_paid: reward,
            remaining_principal: updated.principal,
        })
    }

    /// Pay out accrued reward without touching principal.
    ///
    /// # Errors
    /// `PolicyViolation` under `RewardPayout::WithdrawOnly`, `InvalidAmount`
    /// when nothing has accrued, `ClockRegression`, `InsufficientCustodyFunds`,
    /// or `Arithmetic`. State is unchanged on any error.
    pub fn claim(&mut self, account: &AccountId, now: u64) -> Result<ClaimReceipt, TesseraError> {
        if self.policy.reward_payout == RewardPayout::WithdrawOnly {
            return Err(TesseraError::PolicyViolation(
                "reward is only paid out on withdrawal".to_string(),
            ));
        }
        self.check_clock(now)?;

        let custody = self.custody;
        let previous = self.records.get(account).cloned();
        let mut updated = previous.clone().unwrap_or_default();
        self.accrue_into(&mut updated, now)?;

        let reward = updated.accrued_reward;
        if reward == 0 {
            return Err(TesseraError::InvalidAmount(
                "no accrued reward to claim".to_string(),
            ));
        }
        self.check_reward_pool(reward)?;
        self.tokens.check_transfer_out(&custody, reward)?;
        updated.accrued_reward = 0;

        // Effects.
        let previous_timestamp = self.last_timestamp;
        self.records.insert(*account, updated);
        self.last_timestamp = now;

        // Interactions.
        if let Err(e) = self.tokens.transfer_out(&custody, account, reward) {
            self.rollback(account, previous, previous_timestamp);
            return Err(e);
        }

        info!(account = %account.short(), reward = %Tes::from_grains(reward), "Claim");

        Ok(ClaimReceipt {
            account: *account,
            reward_paid: reward,
        })
    }

    /// What `account` could withdraw right now, and the reward pending on it.
    ///
    /// Returns `(withdrawable, pending_reward)`. `withdrawable` is the full
    /// principal once the lock has ended and zero before. `pending_reward` is
    /// the stored accrued reward plus the projection since `last_claim_time`.
    /// Never mutates state.
    pub fn get_withdrawable_amount(
        &self,
        account: &AccountId,
        now: u64,
    ) -> Result<(Grain, Grain), TesseraError> {
        let record = self.record(account);
        let withdrawable = match record.state(now) {
            StakeState::Unlockable => record.principal,
            StakeState::Locked | StakeState::Unstaked => 0,
        };
        Ok((withdrawable, self.pending_reward_of(&record, now)?))
    }

    /// Reward `account` would receive if it withdrew or claimed at `now`.
    pub fn pending_reward(&self, account: &AccountId, now: u64) -> Result<Grain, TesseraError> {
        self.pending_reward_of(&self.record(account), now)
    }

    fn pending_reward_of(&self, record: &StakeRecord, now: u64) -> Result<Grain, TesseraError> {
        let elapsed = now.saturating_sub(record.last_claim_time);
        let step = rewards::accrue(
            record.principal,
            self.policy.apr_bps,
            elapsed,
            record.reward_carry,
        )?;
        record
            .accrued_reward
            .checked_add(step.reward)
            .ok_or_else(|| TesseraError::Arithmetic("accrued reward overflow".to_string()))
    }

    fn accrue_into(&self, record: &mut StakeRecord, now: u64) -> Result<(), TesseraError> {
        let elapsed = now.saturating_sub(record.last_claim_time);
        let step = rewards::accrue(
            record.principal,
            self.policy.apr_bps,
            elapsed,
            record.reward_carry,
        )?;
        record.accrued_reward = record
            .accrued_reward
            .checked_add(step.reward)
            .ok_or_else(|| TesseraError::Arithmetic("accrued reward overflow".to_string()))?;
        record.reward_carry = step.carry;
        record.last_claim_time = now;
        Ok(())
    }

    // Rewards may only come out of the pool, never out of another staker's principal.
    fn check_reward_pool(&self, reward: Grain) -> Result<(), TesseraError> {
        let available = self.reward_pool();
        if reward > available {
            return Err(TesseraError::InsufficientCustodyFunds {
                needed: reward,
                available,
            });
        }
        Ok(())
    }

    fn check_clock(&self, now: u64) -> Result<(), TesseraError> {
        if now < self.last_timestamp {
            return Err(TesseraError::ClockRegression {
                now,
                last_seen: self.last_timestamp,
            });
        }
        Ok(())
    }

    fn rollback(
        &mut self,
        account: &AccountId,
        previous: Option<StakeRecord>,
        previous_timestamp: u64,
    ) {
        warn!(account = %account.short(), "Rolling back stake record after failed interaction");
        match previous {
            Some(record) => {
                self.records.insert(*account, record);
            }
            None => {
                self.records.remove(account);
            }
        }
        self.last_timestamp = previous_timestamp;
    }
}
