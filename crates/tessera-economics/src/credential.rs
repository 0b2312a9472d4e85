// crates/tessera-economics/src/credential.rs
//
// Reference non-fungible credential registry.
//
// Credentials are issued by a single administrative identity (the staking
// ledger's custody account once deployment wiring is done) and carry
// sequential ids starting at 0.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use tessera_core::error::TesseraError;
use tessera_core::identity::{AccountId, CredentialId};
use tessera_core::traits::CredentialRegistry;

/// In-process credential registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRegistry {
    name: String,
    owner: AccountId,
    next_id: u64,
    /// Holder of each issued credential, ordered by id.
    holders: BTreeMap<CredentialId, AccountId>,
    /// Credential count per holder.
    counts: HashMap<AccountId, u64>,
}

impl CertificateRegistry {
    /// Create an empty registry administered by `owner`.
    pub fn new(name: impl Into<String>, owner: AccountId) -> Self {
        Self {
            name: name.into(),
            owner,
            next_id: 0,
            holders: BTreeMap::new(),
            counts: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The administrative identity allowed to issue.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Id the next issuance will receive.
    pub fn next_id(&self) -> CredentialId {
        CredentialId(self.next_id)
    }

    pub fn total_issued(&self) -> u64 {
        self.holders.len() as u64
    }

    /// All credentials held by `holder`, ascending.
    pub fn credentials_of(&self, holder: &AccountId) -> Vec<CredentialId> {
        self.holders
            .iter()
            .filter(|(_, h)| *h == holder)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Hand the issuing capability to `new_owner`. Only the current owner may do this.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), TesseraError> {
        self.check_issue(caller)?;
        info!(from = %self.owner.short(), to = %new_owner.short(), "Registry ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

impl CredentialRegistry for CertificateRegistry {
    fn check_issue(&self, issuer: &AccountId) -> Result<(), TesseraError> {
        if issuer != &self.owner {
            return Err(TesseraError::Unauthorized { caller: *issuer });
        }
        Ok(())
    }

    fn issue(&mut self, issuer: &AccountId, to: &AccountId) -> Result<CredentialId, TesseraError> {
        self.check_issue(issuer)?;
        let id = CredentialId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| TesseraError::Arithmetic("credential id space exhausted".to_string()))?;
        self.holders.insert(id, *to);
        *self.counts.entry(*to).or_insert(0) += 1;
        info!(id = id.0, holder = %to.short(), "Credential issued");
        Ok(id)
    }

    fn balance_of(&self, holder: &AccountId) -> u64 {
        self.counts.get(holder).copied().unwrap_or(0)
    }

    fn owner_of(&self, id: CredentialId) -> Option<AccountId> {
        self.holders.get(&id).copied()
    }
}
