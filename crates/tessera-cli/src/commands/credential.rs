// crates/tessera-cli/src/commands/credential.rs
//
// `tessera credential {owner-of, balance}`: read-only credential queries.

use clap::Subcommand;

use super::Context;
use crate::output::{print_fields, Field};
use tessera_core::identity::CredentialId;
use tessera_core::traits::CredentialRegistry;

/// Credential subcommands.
#[derive(Debug, Subcommand)]
pub enum CredentialCmd {
    /// Show the holder of a credential.
    OwnerOf {
        /// Credential id (number, optionally prefixed with '#').
        id: String,
    },
    /// Show how many credentials an account holds, and which.
    Balance {
        /// Account (hex id, wallet name, or label).
        account: String,
    },
}

/// Run the credential subcommand.
pub async fn run(ctx: &Context, cmd: &CredentialCmd) -> Result<(), Box<dyn std::error::Error>> {
    let state = ctx.load().await?;
    let registry = state.ledger.credentials();

    match cmd {
        CredentialCmd::OwnerOf { id } => {
            let id = parse_credential_id(id)?;
            let owner = registry
                .owner_of(id)
                .ok_or_else(|| format!("credential {} has not been issued", id))?;
            print_fields(
                ctx.format,
                &[Field::new("credential", id), Field::new("owner", owner)],
            );
        }
        CredentialCmd::Balance { account } => {
            let account = ctx.account(account)?;
            let ids: Vec<String> = registry
                .credentials_of(&account)
                .iter()
                .map(|id| id.to_string())
                .collect();
            print_fields(
                ctx.format,
                &[
                    Field::new("account", account),
                    Field::new("balance", registry.balance_of(&account)),
                    Field::new("credentials", ids.join(", ")),
                ],
            );
        }
    }

    Ok(())
}

fn parse_credential_id(raw: &str) -> Result<CredentialId, Box<dyn std::error::Error>> {
    let digits = raw.trim().trim_start_matches('#');
    Ok(CredentialId(digits.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential_id() {
        assert_eq!(parse_credential_id("3").unwrap(), CredentialId(3));
        assert_eq!(parse_credential_id("#12").unwrap(), CredentialId(12));
        assert!(parse_credential_id("x").is_err());
    }
}
