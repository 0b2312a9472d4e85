// crates/tessera-economics/src/fungible.rs
//
// Reference fungible ledger for $TES.
//
// Holds balances and allowances, supports plain transfers, approval-gated
// pulls (used by the staking ledger to debit depositors), admin-only minting,
// and a self-service faucet bounded by a per-account cooldown.
//
// The admin identity is a stored field checked on every restricted call and
// moved only through `transfer_ownership`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::token::{Grain, Tes, GRAIN_PER_TES};
use tessera_core::error::TesseraError;
use tessera_core::identity::AccountId;
use tessera_core::traits::FungibleLedger;

/// Default faucet payout: 1,000,000 TES.
pub const DEFAULT_FAUCET_AMOUNT: Grain = 1_000_000 * GRAIN_PER_TES;

/// Default faucet cooldown in seconds.
pub const DEFAULT_FAUCET_COOLDOWN_SECS: u64 = 15;

/// Allowance value treated as unlimited; pulls never decrement it.
pub const UNLIMITED_ALLOWANCE: Grain = u128::MAX;

/// Faucet parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetPolicy {
    /// Grains minted per successful faucet call.
    pub amount: Grain,
    /// Minimum seconds between two faucet calls by the same account.
    pub cooldown_secs: u64,
}

impl Default for FaucetPolicy {
    fn default() -> Self {
        Self {
            amount: DEFAULT_FAUCET_AMOUNT,
            cooldown_secs: DEFAULT_FAUCET_COOLDOWN_SECS,
        }
    }
}

/// In-process fungible token ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    admin: AccountId,
    total_supply: Grain,
    balances: HashMap<AccountId, Grain>,
    /// owner -> spender -> remaining allowance.
    allowances: HashMap<AccountId, HashMap<AccountId, Grain>>,
    faucet: FaucetPolicy,
    /// Timestamp of each account's last successful faucet call.
    last_faucet: HashMap<AccountId, u64>,
}

impl TokenLedger {
    /// Create a ledger and mint `initial_supply` to `admin`.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        admin: AccountId,
        initial_supply: Grain,
        faucet: FaucetPolicy,
    ) -> Self {
        let mut balances = HashMap::new();
        if initial_supply > 0 {
            balances.insert(admin, initial_supply);
        }
        Self {
            name: name.into(),
            symbol: symbol.into(),
            admin,
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
            faucet,
            last_faucet: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The administrative identity allowed to mint.
    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn total_supply(&self) -> Grain {
        self.total_supply
    }

    pub fn faucet_policy(&self) -> &FaucetPolicy {
        &self.faucet
    }

    /// Remaining amount `spender` may pull from `owner`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Grain {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Number of accounts with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `InsufficientBalance` if `from` cannot cover it.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Grain,
    ) -> Result<(), TesseraError> {
        require_positive(amount)?;
        self.check_balance(from, amount)?;
        self.move_balance(from, to, amount);
        debug!(from = %from.short(), to = %to.short(), amount = %Tes::from_grains(amount), "transfer");
        Ok(())
    }

    /// Set the amount `spender` may pull from `owner`. Overwrites any previous value.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Grain) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        debug!(owner = %owner.short(), spender = %spender.short(), amount = %Tes::from_grains(amount), "approve");
    }

    /// Pull `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    ///
    /// # Errors
    /// `TransferRejected` if the allowance is too small, `InsufficientBalance`
    /// if `from` cannot cover the amount.
    pub fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Grain,
    ) -> Result<(), TesseraError> {
        self.check_pull(spender, from, amount)?;
        self.spend_allowance(from, spender, amount);
        self.move_balance(from, to, amount);
        Ok(())
    }

    /// Create `amount` new grains for `to`. Restricted to the admin.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Grain,
    ) -> Result<(), TesseraError> {
        if caller != &self.admin {
            return Err(TesseraError::Unauthorized { caller: *caller });
        }
        require_positive(amount)?;
        self.credit_new_supply(to, amount)?;
        info!(to = %to.short(), amount = %Tes::from_grains(amount), "Minted");
        Ok(())
    }

    /// Self-service mint of the fixed faucet amount to `account`.
    ///
    /// Returns the amount minted.
    ///
    /// # Errors
    /// `CooldownActive` if the previous call by `account` was less than
    /// `cooldown_secs` ago.
    pub fn faucet(&mut self, account: &AccountId, now: u64) -> Result<Grain, TesseraError> {
        if let Some(&last) = self.last_faucet.get(account) {
            let ready_at = last.saturating_add(self.faucet.cooldown_secs);
            if now < ready_at {
                return Err(TesseraError::CooldownActive {
                    remaining_secs: ready_at - now,
                });
            }
        }

        let amount = self.faucet.amount;
        self.credit_new_supply(account, amount)?;
        self.last_faucet.insert(*account, now);
        info!(account = %account.short(), amount = %Tes::from_grains(amount), "Faucet payout");
        Ok(amount)
    }

    /// Hand the admin identity to `new_admin`. Only the current admin may do this.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_admin: AccountId,
    ) -> Result<(), TesseraError> {
        if caller != &self.admin {
            return Err(TesseraError::Unauthorized { caller: *caller });
        }
        info!(from = %self.admin.short(), to = %new_admin.short(), "Token admin transferred");
        self.admin = new_admin;
        Ok(())
    }

    fn check_balance(&self, account: &AccountId, amount: Grain) -> Result<(), TesseraError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(TesseraError::InsufficientBalance {
                account: *account,
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    fn check_pull(
        &self,
        spender: &AccountId,
        from: &AccountId,
        amount: Grain,
    ) -> Result<(), TesseraError> {
        require_positive(amount)?;
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TesseraError::TransferRejected(format!(
                "allowance of {} for spender {} is below {}",
                Tes::from_grains(allowed),
                spender.short(),
                Tes::from_grains(amount)
            )));
        }
        self.check_balance(from, amount)
    }

    fn spend_allowance(&mut self, owner: &AccountId, spender: &AccountId, amount: Grain) {
        if let Some(allowed) = self.allowances.get_mut(owner).and_then(|m| m.get_mut(spender)) {
            if *allowed != UNLIMITED_ALLOWANCE {
                *allowed -= amount;
            }
        }
    }

    // Callers have already checked that `from` covers `amount`.
    fn move_balance(&mut self, from: &AccountId, to: &AccountId, amount: Grain) {
        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= amount;
        }
        *self.balances.entry(*to).or_insert(0) += amount;
    }

    fn credit_new_supply(&mut self, to: &AccountId, amount: Grain) -> Result<(), TesseraError> {
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| TesseraError::Arithmetic("total supply overflow".to_string()))?;
        self.total_supply = total;
        *self.balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }
}

impl FungibleLedger for TokenLedger {
    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn check_transfer_in(
        &self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError> {
        self.check_pull(custody, from, amount)
    }

    fn transfer_in(
        &mut self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError> {
        self.transfer_from(custody, from, custody, amount)
    }

    fn reverse_transfer_in(
        &mut self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError> {
        self.check_transfer_out(custody, amount)?;
        let allowed = self.allowance(from, custody);
        if allowed != UNLIMITED_ALLOWANCE {
            let restored = allowed
                .checked_add(amount)
                .ok_or_else(|| TesseraError::Arithmetic("allowance overflow".to_string()))?;
            self.allowances
                .entry(*from)
                .or_default()
                .insert(*custody, restored);
        }
        self.move_balance(custody, from, amount);
        debug!(from = %from.short(), amount = %Tes::from_grains(amount), "transfer_in reversed");
        Ok(())
    }

    fn check_transfer_out(&self, custody: &AccountId, amount: u128) -> Result<(), TesseraError> {
        let available = self.balance_of(custody);
        if available < amount {
            return Err(TesseraError::InsufficientCustodyFunds {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    fn transfer_out(
        &mut self,
        custody: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError> {
        self.check_transfer_out(custody, amount)?;
        self.move_balance(custody, to, amount);
        Ok(())
    }
}

fn require_positive(amount: Grain) -> Result<(), TesseraError> {
    if amount == 0 {
        return Err(TesseraError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AccountId {
        AccountId::from_label("admin")
    }

    fn user() -> AccountId {
        AccountId::from_label("user")
    }

    fn ledger() -> TokenLedger {
        TokenLedger::new(
            "Tessera",
            "TES",
            admin(),
            Tes::from_whole(1_000_000).grains,
            FaucetPolicy::default(),
        )
    }

    #[test]
    fn test_initial_supply_goes_to_admin() {
        let ledger = ledger();
        assert_eq!(ledger.balance_of(&admin()), Tes::from_whole(1_000_000).grains);
        assert_eq!(ledger.total_supply(), Tes::from_whole(1_000_000).grains);
        assert_eq!(ledger.holder_count(), 1);
    }

    #[test]
    fn test_transfer() {
        let mut ledger = ledger();
        ledger.transfer(&admin(), &user(), 500).unwrap();
        assert_eq!(ledger.balance_of(&user()), 500);
        assert_eq!(
            ledger.balance_of(&admin()),
            Tes::from_whole(1_000_000).grains - 500
        );
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = ledger();
        let err = ledger.transfer(&user(), &admin(), 1).unwrap_err();
        assert_eq!(
            err,
            TesseraError::InsufficientBalance {
                account: user(),
                needed: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_transfer_zero_rejected() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.transfer(&admin(), &user(), 0),
            Err(TesseraError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_mint_by_admin() {
        let mut ledger = ledger();
        ledger.mint(&admin(), &user(), 42).unwrap();
        assert_eq!(ledger.balance_of(&user()), 42);
        assert_eq!(
            ledger.total_supply(),
            Tes::from_whole(1_000_000).grains + 42
        );
    }

    #[test]
    fn test_mint_by_non_admin_is_unauthorized() {
        let mut ledger = ledger();
        let supply = ledger.total_supply();
        let err = ledger.mint(&user(), &user(), 42).unwrap_err();
        assert_eq!(err, TesseraError::Unauthorized { caller: user() });
        assert_eq!(ledger.balance_of(&user()), 0);
        assert_eq!(ledger.total_supply(), supply);
    }

    #[test]
    fn test_faucet_cooldown() {
        let mut ledger = ledger();
        assert_eq!(ledger.faucet(&user(), 1_000).unwrap(), DEFAULT_FAUCET_AMOUNT);

        let err = ledger.faucet(&user(), 1_000).unwrap_err();
        assert_eq!(
            err,
            TesseraError::CooldownActive {
                remaining_secs: DEFAULT_FAUCET_COOLDOWN_SECS
            }
        );
        assert!(matches!(
            ledger.faucet(&user(), 1_000 + DEFAULT_FAUCET_COOLDOWN_SECS - 1),
            Err(TesseraError::CooldownActive { remaining_secs: 1 })
        ));

        ledger
            .faucet(&user(), 1_000 + DEFAULT_FAUCET_COOLDOWN_SECS)
            .unwrap();
        assert_eq!(ledger.balance_of(&user()), 2 * DEFAULT_FAUCET_AMOUNT);
    }

    #[test]
    fn test_default_faucet_payout() {
        assert_eq!(FaucetPolicy::default().amount, Tes::from_whole(1_000_000).grains);

        let mut ledger = ledger();
        ledger.faucet(&user(), 1_000).unwrap();
        ledger
            .faucet(&user(), 1_000 + DEFAULT_FAUCET_COOLDOWN_SECS)
            .unwrap();
        assert_eq!(ledger.balance_of(&user()), Tes::from_whole(2_000_000).grains);
    }

    #[test]
    fn test_faucet_cooldown_is_per_account() {
        let mut ledger = ledger();
        ledger.faucet(&user(), 1_000).unwrap();
        assert!(ledger.faucet(&admin(), 1_000).is_ok());
    }

    #[test]
    fn test_transfer_from_requires_allowance() {
        let mut ledger = ledger();
        let spender = AccountId::from_label("spender");
        let err = ledger
            .transfer_from(&spender, &admin(), &user(), 10)
            .unwrap_err();
        assert!(matches!(err, TesseraError::TransferRejected(_)));

        ledger.approve(&admin(), &spender, 25);
        ledger.transfer_from(&spender, &admin(), &user(), 10).unwrap();
        assert_eq!(ledger.balance_of(&user()), 10);
        assert_eq!(ledger.allowance(&admin(), &spender), 15);
    }

    #[test]
    fn test_unlimited_allowance_not_decremented() {
        let mut ledger = ledger();
        let spender = AccountId::from_label("spender");
        ledger.approve(&admin(), &spender, UNLIMITED_ALLOWANCE);
        ledger.transfer_from(&spender, &admin(), &user(), 10).unwrap();
        assert_eq!(ledger.allowance(&admin(), &spender), UNLIMITED_ALLOWANCE);
    }

    #[test]
    fn test_reverse_transfer_in_restores_balance_and_allowance() {
        let mut ledger = ledger();
        let custody = AccountId::from_label("custody");
        ledger.approve(&admin(), &custody, 100);
        ledger.transfer_in(&admin(), &custody, 100).unwrap();
        assert_eq!(ledger.allowance(&admin(), &custody), 0);

        ledger.reverse_transfer_in(&admin(), &custody, 100).unwrap();
        assert_eq!(ledger.allowance(&admin(), &custody), 100);
        assert_eq!(ledger.balance_of(&custody), 0);
        assert_eq!(ledger.balance_of(&admin()), Tes::from_whole(1_000_000).grains);

        // An unlimited approval is left as it is.
        ledger.approve(&admin(), &custody, UNLIMITED_ALLOWANCE);
        ledger.transfer_in(&admin(), &custody, 100).unwrap();
        ledger.reverse_transfer_in(&admin(), &custody, 100).unwrap();
        assert_eq!(ledger.allowance(&admin(), &custody), UNLIMITED_ALLOWANCE);
    }

    #[test]
    fn test_transfer_out_custody_shortfall() {
        let mut ledger = ledger();
        let custody = AccountId::from_label("custody");
        let err = ledger.transfer_out(&custody, &user(), 5).unwrap_err();
        assert_eq!(
            err,
            TesseraError::InsufficientCustodyFunds {
                needed: 5,
                available: 0
            }
        );
    }

    #[test]
    fn test_transfer_ownership() {
        let mut ledger = ledger();
        assert!(ledger.transfer_ownership(&user(), user()).is_err());
        ledger.transfer_ownership(&admin(), user()).unwrap();
        assert_eq!(ledger.admin(), &user());
        assert!(ledger.mint(&admin(), &admin(), 1).is_err());
        assert!(ledger.mint(&user(), &user(), 1).is_ok());
    }
}
