// crates/tessera-cli/src/commands/wallet.rs
//
// `tessera wallet {create, import, show}`: named ed25519 keypairs.
//
// A wallet's account id is its public key. Keys live under
// `<data_dir>/keys/<name>.secret` and `<name>.pub`, hex-encoded.

use clap::Subcommand;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::fs;

use super::Context;
use crate::accounts::keys_dir;
use crate::output::{print_fields, Field};
use tessera_core::identity::AccountId;
use tessera_core::traits::FungibleLedger;
use tessera_economics::Tes;

/// Wallet management subcommands.
#[derive(Debug, Subcommand)]
pub enum WalletCmd {
    /// Generate a new ed25519 keypair.
    Create {
        /// Wallet name.
        name: String,
    },
    /// Import a keypair from a hex-encoded secret key file.
    Import {
        /// Wallet name.
        name: String,
        /// Path to the secret key file (hex-encoded).
        #[arg(long)]
        path: String,
    },
    /// Show a wallet's account id and, if the ledger exists, its balances.
    Show {
        /// Wallet name.
        name: String,
    },
}

/// Run the wallet subcommand.
pub async fn run(ctx: &Context, cmd: &WalletCmd) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        WalletCmd::Create { name } => create_wallet(ctx, name).await,
        WalletCmd::Import { name, path } => import_wallet(ctx, name, path).await,
        WalletCmd::Show { name } => show_wallet(ctx, name).await,
    }
}

fn validate_name(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok || name == "custody" {
        return Err(format!("invalid wallet name '{}'", name).into());
    }
    Ok(())
}

fn write_keys(
    ctx: &Context,
    name: &str,
    signing_key: &SigningKey,
) -> Result<AccountId, Box<dyn std::error::Error>> {
    let dir = keys_dir(&ctx.data_dir());
    fs::create_dir_all(&dir)?;

    let secret_path = dir.join(format!("{}.secret", name));
    if secret_path.exists() {
        return Err(format!("wallet '{}' already exists", name).into());
    }
    let account = AccountId::from_bytes(signing_key.verifying_key().to_bytes());

    fs::write(&secret_path, hex::encode(signing_key.to_bytes()))?;
    fs::write(dir.join(format!("{}.pub", name)), account.to_hex())?;
    tracing::debug!("Wrote keys for wallet {} to {}", name, dir.display());
    Ok(account)
}

async fn create_wallet(ctx: &Context, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    validate_name(name)?;
    let signing_key = SigningKey::generate(&mut OsRng);
    let account = write_keys(ctx, name, &signing_key)?;

    println!("Wallet '{}' created.", name);
    println!("  Account: {}", account);
    println!();
    println!("IMPORTANT: Back up your secret key file securely.");
    println!(
        "  Secret key: {}",
        keys_dir(&ctx.data_dir()).join(format!("{}.secret", name)).display()
    );
    Ok(())
}

async fn import_wallet(
    ctx: &Context,
    name: &str,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    validate_name(name)?;
    let contents = fs::read_to_string(path)?;
    let bytes: [u8; 32] = hex::decode(contents.trim())?
        .try_into()
        .map_err(|_| "Expected 64-character hex-encoded secret key")?;
    let signing_key = SigningKey::from_bytes(&bytes);
    let account = write_keys(ctx, name, &signing_key)?;

    println!("Imported wallet '{}' from {}", name, path);
    println!("  Account: {}", account);
    Ok(())
}

async fn show_wallet(ctx: &Context, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pub_path = keys_dir(&ctx.data_dir()).join(format!("{}.pub", name));
    if !pub_path.exists() {
        return Err(format!(
            "no wallet named '{}' (run `tessera wallet create {}`)",
            name, name
        )
        .into());
    }
    let account: AccountId = fs::read_to_string(&pub_path)?.trim().parse()?;

    let mut fields = vec![Field::new("name", name), Field::new("account", account)];
    // Balances are optional: the wallet may predate `tessera init`.
    if let Ok(state) = ctx.load().await {
        let ledger = &state.ledger;
        let record = ledger.record(&account);
        fields.push(Field::new(
            "balance",
            Tes::from_grains(ledger.tokens().balance_of(&account)),
        ));
        fields.push(Field::new("staked", Tes::from_grains(record.principal)));
        fields.push(Field::new(
            "credentials",
            ledger.credentials().credentials_of(&account).len(),
        ));
    }
    print_fields(ctx.format, &fields);
    Ok(())
}
