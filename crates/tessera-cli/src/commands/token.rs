// crates/tessera-cli/src/commands/token.rs
//
// `tessera token {info, balance, faucet, mint, transfer, approve}`.

use clap::Subcommand;

use super::{parse_amount, Context};
use crate::output::{print_fields, Field};
use tessera_core::traits::FungibleLedger;
use tessera_economics::{Tes, UNLIMITED_ALLOWANCE};

/// Token subcommands.
#[derive(Debug, Subcommand)]
pub enum TokenCmd {
    /// Show token metadata and supply.
    Info,
    /// Show an account's balance.
    Balance {
        /// Account (hex id, wallet name, or label).
        account: String,
    },
    /// Request the fixed faucet payout (subject to a cooldown).
    Faucet {
        /// Receiving account.
        account: String,
    },
    /// Mint new tokens. Only the token admin may mint.
    Mint {
        /// Receiving account.
        to: String,
        /// Amount in TES (decimal).
        amount: String,
        /// Calling account. Defaults to the configured admin.
        #[arg(long)]
        caller: Option<String>,
    },
    /// Transfer tokens between accounts.
    Transfer {
        /// Sending account.
        #[arg(long)]
        from: String,
        /// Receiving account.
        #[arg(long)]
        to: String,
        /// Amount in TES (decimal).
        amount: String,
    },
    /// Allow a spender (by default the staking custody) to pull tokens.
    Approve {
        /// Owning account.
        owner: String,
        /// Amount in TES (decimal). Omit with --unlimited.
        #[arg(required_unless_present = "unlimited")]
        amount: Option<String>,
        /// Spender account.
        #[arg(long, default_value = "custody")]
        spender: String,
        /// Approve an unlimited amount.
        #[arg(long)]
        unlimited: bool,
    },
}

/// Run the token subcommand.
pub async fn run(ctx: &Context, cmd: &TokenCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = ctx.load().await?;
    let now = state.now();

    match cmd {
        TokenCmd::Info => {
            let tokens = state.ledger.tokens();
            let faucet = tokens.faucet_policy();
            print_fields(
                ctx.format,
                &[
                    Field::new("name", tokens.name()),
                    Field::new("symbol", tokens.symbol()),
                    Field::new("admin", tokens.admin()),
                    Field::new("total_supply", Tes::from_grains(tokens.total_supply())),
                    Field::new("holders", tokens.holder_count()),
                    Field::new("faucet_amount", Tes::from_grains(faucet.amount)),
                    Field::new("faucet_cooldown_secs", faucet.cooldown_secs),
                ],
            );
            return Ok(());
        }
        TokenCmd::Balance { account } => {
            let account = ctx.account(account)?;
            let tokens = state.ledger.tokens();
            print_fields(
                ctx.format,
                &[
                    Field::new("account", account),
                    Field::new("balance", Tes::from_grains(tokens.balance_of(&account))),
                    Field::new(
                        "custody_allowance",
                        format_allowance(tokens.allowance(&account, state.ledger.custody())),
                    ),
                ],
            );
            return Ok(());
        }
        TokenCmd::Faucet { account } => {
            let account = ctx.account(account)?;
            let paid = state.ledger.tokens_mut().faucet(&account, now)?;
            println!("Faucet paid {} to {}", Tes::from_grains(paid), account);
        }
        TokenCmd::Mint { to, amount, caller } => {
            let to = ctx.account(to)?;
            let caller = match caller {
                Some(c) => ctx.account(c)?,
                None => ctx.admin()?,
            };
            let amount = parse_amount(amount)?;
            state.ledger.tokens_mut().mint(&caller, &to, amount)?;
            println!("Minted {} to {}", Tes::from_grains(amount), to);
        }
        TokenCmd::Transfer { from, to, amount } => {
            let from = ctx.account(from)?;
            let to = ctx.account(to)?;
            let amount = parse_amount(amount)?;
            state.ledger.tokens_mut().transfer(&from, &to, amount)?;
            println!("Transferred {} from {} to {}", Tes::from_grains(amount), from, to);
        }
        TokenCmd::Approve {
            owner,
            amount,
            spender,
            unlimited,
        } => {
            let owner = ctx.account(owner)?;
            let spender = ctx.account(spender)?;
            let amount = match (unlimited, amount) {
                (true, _) => UNLIMITED_ALLOWANCE,
                (false, Some(a)) => parse_amount(a)?,
                (false, None) => return Err("amount required unless --unlimited".into()),
            };
            state.ledger.tokens_mut().approve(&owner, &spender, amount);
            println!(
                "Approved {} to spend {} for {}",
                spender,
                format_allowance(amount),
                owner
            );
        }
    }

    ctx.save(&state).await?;
    Ok(())
}

fn format_allowance(amount: u128) -> String {
    if amount == UNLIMITED_ALLOWANCE {
        "unlimited".to_string()
    } else {
        Tes::from_grains(amount).to_string()
    }
}
