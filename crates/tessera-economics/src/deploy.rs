// crates/tessera-economics/src/deploy.rs
//
// One-time wiring of the three components:
//   1. create the token, minting the initial supply to the admin;
//   2. create the credential registry owned by the admin;
//   3. create the staking ledger with its own custody identity;
//   4. hand registry ownership to the custody identity;
//   5. pre-fund custody with the reward pool from the admin's supply.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credential::CertificateRegistry;
use crate::fungible::{FaucetPolicy, TokenLedger};
use crate::staking::{StakingLedger, StakingPolicy};
use crate::token::{Grain, Tes, GRAIN_PER_TES};
use tessera_core::error::TesseraError;
use tessera_core::identity::AccountId;

/// Label hashed into the staking ledger's custody account id.
pub const CUSTODY_LABEL: &str = "tessera/staking-custody";

/// Default initial token supply: 1,000,000,000 TES.
pub const DEFAULT_INITIAL_SUPPLY: Grain = 1_000_000_000 * GRAIN_PER_TES;

/// Default reward pool moved into custody at deployment: 10,000,000 TES.
pub const DEFAULT_REWARD_POOL: Grain = 10_000_000 * GRAIN_PER_TES;

/// The staking ledger over the in-process reference collaborators.
pub type StandardLedger = StakingLedger<TokenLedger, CertificateRegistry>;

/// Parameters for a fresh deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub token_name: String,
    pub token_symbol: String,
    pub credential_name: String,
    /// Grains minted to the admin at token creation.
    pub initial_supply: Grain,
    /// Grains moved from the admin into custody to fund rewards.
    pub reward_pool: Grain,
    pub faucet: FaucetPolicy,
    pub policy: StakingPolicy,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            token_name: "Tessera".to_string(),
            token_symbol: "TES".to_string(),
            credential_name: "Tessera Stake Certificate".to_string(),
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            reward_pool: DEFAULT_REWARD_POOL,
            faucet: FaucetPolicy::default(),
            policy: StakingPolicy::default(),
        }
    }
}

/// The custody account id every deployment uses.
pub fn custody_account() -> AccountId {
    AccountId::from_label(CUSTODY_LABEL)
}

/// Deploy and wire a token, a credential registry, and a staking ledger.
///
/// # Errors
/// Returns `TesseraError::Config` for an invalid policy, or
/// `InsufficientBalance` if the reward pool exceeds the initial supply.
pub fn deploy(admin: &AccountId, config: &DeployConfig) -> Result<StandardLedger, TesseraError> {
    config.policy.validate()?;

    let custody = custody_account();
    let mut tokens = TokenLedger::new(
        config.token_name.clone(),
        config.token_symbol.clone(),
        *admin,
        config.initial_supply,
        config.faucet,
    );
    info!(admin = %admin.short(), supply = %Tes::from_grains(config.initial_supply), "Token deployed");

    let mut credentials = CertificateRegistry::new(config.credential_name.clone(), *admin);
    credentials.transfer_ownership(admin, custody)?;

    if config.reward_pool > 0 {
        tokens.transfer(admin, &custody, config.reward_pool)?;
    }
    info!(
        custody = %custody.short(),
        reward_pool = %Tes::from_grains(config.reward_pool),
        "Staking ledger deployed and wired"
    );

    Ok(StakingLedger::new(custody, config.policy, tokens, credentials))
}
