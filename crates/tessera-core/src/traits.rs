// crates/tessera-core/src/traits.rs
//
// Collaborator interfaces consumed by the staking ledger.
//
// Each mutating operation comes with a `check_*` counterpart that performs the
// same validation without touching state. The ledger runs every check before
// it mutates its own records and only then performs the interaction, so a
// collaborator call never observes a half-updated stake record.

use crate::error::TesseraError;
use crate::identity::{AccountId, CredentialId};

/// Fungible balance ledger. Amounts are in grains.
///
/// Implemented by tessera-economics (`TokenLedger`).
pub trait FungibleLedger {
    /// Current balance of `account`.
    fn balance_of(&self, account: &AccountId) -> u128;

    /// Validate that `custody` may pull `amount` from `from`.
    fn check_transfer_in(
        &self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError>;

    /// Move `amount` from `from` into `custody`, consuming `from`'s approval.
    ///
    /// Fails with `InsufficientBalance` or `TransferRejected`.
    fn transfer_in(
        &mut self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError>;

    /// Undo a `transfer_in` that just completed: return `amount` from `custody`
    /// to `from` and give back the approval it consumed.
    fn reverse_transfer_in(
        &mut self,
        from: &AccountId,
        custody: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError>;

    /// Validate that `custody` can pay `amount` out.
    fn check_transfer_out(&self, custody: &AccountId, amount: u128) -> Result<(), TesseraError>;

    /// Pay `amount` from `custody` to `to`.
    ///
    /// Fails with `InsufficientCustodyFunds`.
    fn transfer_out(
        &mut self,
        custody: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TesseraError>;
}

/// Non-fungible credential registry.
///
/// Implemented by tessera-economics (`CertificateRegistry`).
pub trait CredentialRegistry {
    /// Validate that `issuer` holds the administrative identity.
    fn check_issue(&self, issuer: &AccountId) -> Result<(), TesseraError>;

    /// Issue the next credential to `to`. Fails with `Unauthorized`.
    fn issue(&mut self, issuer: &AccountId, to: &AccountId) -> Result<CredentialId, TesseraError>;

    /// Number of credentials held by `holder`.
    fn balance_of(&self, holder: &AccountId) -> u64;

    /// Current holder of credential `id`, if it was ever issued.
    fn owner_of(&self, id: CredentialId) -> Option<AccountId>;
}
