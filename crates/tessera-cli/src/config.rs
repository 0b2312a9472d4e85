// crates/tessera-cli/src/config.rs
//
// Runtime configuration for the Tessera CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use tessera_core::error::TesseraError;
use tessera_economics::staking::{CredentialIssuance, LockRenewal, RewardPayout};
use tessera_economics::{DeployConfig, FaucetPolicy, StakingPolicy, Tes};

/// Where `now` comes from for ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Wall-clock time.
    System,
    /// Simulated time stored in the state file, moved with `tessera clock advance`.
    Manual,
}

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory holding the state file and wallet keys.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Clock used for ledger timestamps.
    #[serde(default = "default_clock")]
    pub clock: ClockMode,

    /// Account that deploys the ledger and holds the admin capabilities.
    #[serde(default = "default_admin")]
    pub admin: String,

    #[serde(default)]
    pub token: TokenConfig,

    #[serde(default)]
    pub staking: StakingConfig,
}

/// `[token]` section. Amounts are decimal TES strings.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_name")]
    pub name: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    #[serde(default = "default_initial_supply")]
    pub initial_supply: String,
    #[serde(default = "default_reward_pool")]
    pub reward_pool: String,
    #[serde(default = "default_faucet_amount")]
    pub faucet_amount: String,
    #[serde(default = "default_faucet_cooldown_secs")]
    pub faucet_cooldown_secs: u64,
}

/// `[staking]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StakingConfig {
    #[serde(default = "default_lock_duration_secs")]
    pub lock_duration_secs: u64,
    #[serde(default = "default_apr_bps")]
    pub apr_bps: u32,
    #[serde(default = "default_certificate_threshold")]
    pub certificate_threshold: String,
    #[serde(default = "default_credential_name")]
    pub credential_name: String,
    #[serde(default)]
    pub lock_renewal: LockRenewal,
    #[serde(default)]
    pub credential_issuance: CredentialIssuance,
    #[serde(default)]
    pub reward_payout: RewardPayout,
}

fn default_data_dir() -> String {
    "~/.tessera".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_clock() -> ClockMode {
    ClockMode::Manual
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_token_name() -> String {
    "Tessera".to_string()
}

fn default_token_symbol() -> String {
    "TES".to_string()
}

fn default_initial_supply() -> String {
    "1000000000".to_string()
}

fn default_reward_pool() -> String {
    "10000000".to_string()
}

fn default_faucet_amount() -> String {
    "1000000".to_string()
}

fn default_faucet_cooldown_secs() -> u64 {
    tessera_economics::fungible::DEFAULT_FAUCET_COOLDOWN_SECS
}

fn default_lock_duration_secs() -> u64 {
    tessera_economics::DEFAULT_LOCK_DURATION_SECS
}

fn default_apr_bps() -> u32 {
    tessera_economics::DEFAULT_APR_BPS
}

fn default_certificate_threshold() -> String {
    "1000000".to_string()
}

fn default_credential_name() -> String {
    "Tessera Stake Certificate".to_string()
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            initial_supply: default_initial_supply(),
            reward_pool: default_reward_pool(),
            faucet_amount: default_faucet_amount(),
            faucet_cooldown_secs: default_faucet_cooldown_secs(),
        }
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            lock_duration_secs: default_lock_duration_secs(),
            apr_bps: default_apr_bps(),
            certificate_threshold: default_certificate_threshold(),
            credential_name: default_credential_name(),
            lock_renewal: LockRenewal::default(),
            credential_issuance: CredentialIssuance::default(),
            reward_payout: RewardPayout::default(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            clock: default_clock(),
            admin: default_admin(),
            token: TokenConfig::default(),
            staking: StakingConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    /// Translate the TOML sections into deployment parameters.
    pub fn deploy_config(&self) -> Result<DeployConfig, TesseraError> {
        let policy = StakingPolicy {
            lock_duration_secs: self.staking.lock_duration_secs,
            apr_bps: self.staking.apr_bps,
            certificate_threshold: parse_tes(
                "staking.certificate_threshold",
                &self.staking.certificate_threshold,
            )?,
            lock_renewal: self.staking.lock_renewal,
            credential_issuance: self.staking.credential_issuance,
            reward_payout: self.staking.reward_payout,
        };
        policy.validate()?;

        Ok(DeployConfig {
            token_name: self.token.name.clone(),
            token_symbol: self.token.symbol.clone(),
            credential_name: self.staking.credential_name.clone(),
            initial_supply: parse_tes("token.initial_supply", &self.token.initial_supply)?,
            reward_pool: parse_tes("token.reward_pool", &self.token.reward_pool)?,
            faucet: FaucetPolicy {
                amount: parse_tes("token.faucet_amount", &self.token.faucet_amount)?,
                cooldown_secs: self.token.faucet_cooldown_secs,
            },
            policy,
        })
    }
}

fn parse_tes(key: &str, value: &str) -> Result<u128, TesseraError> {
    value
        .parse::<Tes>()
        .map(|t| t.grains)
        .map_err(|e| TesseraError::Config(format!("{}: {}", key, e)))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_economics::{CERTIFICATE_THRESHOLD, GRAIN_PER_TES};

    #[test]
    fn test_defaults_match_library_defaults() {
        let deploy = CliConfig::default().deploy_config().unwrap();
        assert_eq!(deploy, DeployConfig::default());
        assert_eq!(deploy.policy.certificate_threshold, CERTIFICATE_THRESHOLD);
        // One default faucet payout is enough for a credential-issuing deposit.
        assert_eq!(deploy.faucet.amount, 1_000_000 * GRAIN_PER_TES);
        assert!(deploy.faucet.amount >= CERTIFICATE_THRESHOLD);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            clock = "system"
            log_level = "debug"

            [token]
            faucet_amount = "2.5"
            faucet_cooldown_secs = 60

            [staking]
            apr_bps = 1200
            lock_renewal = "keep_existing"
            reward_payout = "withdraw_only"
            "#,
        )
        .unwrap();

        assert_eq!(config.clock, ClockMode::System);
        assert_eq!(config.admin, "admin");
        let deploy = config.deploy_config().unwrap();
        assert_eq!(deploy.faucet.amount, 5 * GRAIN_PER_TES / 2);
        assert_eq!(deploy.faucet.cooldown_secs, 60);
        assert_eq!(deploy.policy.apr_bps, 1200);
        assert_eq!(deploy.policy.lock_renewal, LockRenewal::KeepExisting);
        assert_eq!(deploy.policy.reward_payout, RewardPayout::WithdrawOnly);
        assert_eq!(deploy.policy.lock_duration_secs, 300);
    }

    #[test]
    fn test_bad_amount_is_config_error() {
        let mut config = CliConfig::default();
        config.token.reward_pool = "lots".to_string();
        assert!(matches!(config.deploy_config(), Err(TesseraError::Config(_))));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
