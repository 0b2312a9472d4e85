// crates/tessera-cli/src/commands/stake.rs
//
// `tessera stake {deposit, withdraw, claim, info, list}`: staking commands.

use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::{format_time, parse_amount, Context};
use crate::output::{print_fields, print_rows, Field};
use tessera_core::identity::AccountId;
use tessera_economics::{StandardLedger, Tes};

/// Staking subcommands.
#[derive(Debug, Subcommand)]
pub enum StakeCmd {
    /// Lock tokens into stake. The lock period restarts on every deposit.
    Deposit {
        /// Staking account.
        account: String,
        /// Amount in TES (decimal).
        amount: String,
        /// Raise the custody allowance to this amount first, if it is lower.
        #[arg(long)]
        approve: bool,
    },
    /// Withdraw principal after the lock has ended. Pays pending reward too.
    Withdraw {
        /// Staking account.
        account: String,
        /// Amount in TES (decimal). Defaults to the full principal.
        amount: Option<String>,
    },
    /// Pay out pending reward without touching principal.
    Claim {
        /// Staking account.
        account: String,
    },
    /// Show the stake record for an account.
    Info {
        /// Staking account.
        account: String,
    },
    /// List all stake records.
    List,
}

/// One row of `tessera stake list`.
#[derive(Debug, Serialize, Tabled)]
struct StakeRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Unlocks At")]
    lock_end_time: u64,
    #[tabled(rename = "Pending Reward")]
    pending_reward: String,
    #[tabled(rename = "Credentials")]
    credentials: u64,
}

/// Run the stake subcommand.
pub async fn run(ctx: &Context, cmd: &StakeCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = ctx.load().await?;
    let now = state.now();

    match cmd {
        StakeCmd::Deposit {
            account,
            amount,
            approve,
        } => {
            let account = ctx.account(account)?;
            let amount = parse_amount(amount)?;
            if *approve {
                ensure_custody_allowance(&mut state.ledger, &account, amount);
            }
            let receipt = state.ledger.deposit(&account, amount, now)?;
            let mut fields = vec![
                Field::new("account", receipt.account),
                Field::new("deposited", Tes::from_grains(receipt.amount)),
                Field::new("principal", Tes::from_grains(receipt.principal)),
                Field::new("unlocks_at", format_time(receipt.lock_end_time)),
            ];
            if let Some(id) = receipt.credential {
                fields.push(Field::new("credential", id));
            }
            print_fields(ctx.format, &fields);
        }
        StakeCmd::Withdraw { account, amount } => {
            let account = ctx.account(account)?;
            let amount = match amount {
                Some(a) => parse_amount(a)?,
                None => state.ledger.record(&account).principal,
            };
            let receipt = state.ledger.withdraw(&account, amount, now)?;
            print_fields(
                ctx.format,
                &[
                    Field::new("account", receipt.account),
                    Field::new("principal_paid", Tes::from_grains(receipt.principal_paid)),
                    Field::new("reward_paid", Tes::from_grains(receipt.reward_paid)),
                    Field::new(
                        "remaining_principal",
                        Tes::from_grains(receipt.remaining_principal),
                    ),
                ],
            );
        }
        StakeCmd::Claim { account } => {
            let account = ctx.account(account)?;
            let receipt = state.ledger.claim(&account, now)?;
            print_fields(
                ctx.format,
                &[
                    Field::new("account", receipt.account),
                    Field::new("reward_paid", Tes::from_grains(receipt.reward_paid)),
                ],
            );
        }
        StakeCmd::Info { account } => {
            let account = ctx.account(account)?;
            let record = state.ledger.record(&account);
            let (withdrawable, pending) = state.ledger.get_withdrawable_amount(&account, now)?;
            print_fields(
                ctx.format,
                &[
                    Field::new("account", account),
                    Field::new("state", record.state(now)),
                    Field::new("principal", Tes::from_grains(record.principal)),
                    Field::new("withdrawable", Tes::from_grains(withdrawable)),
                    Field::new("pending_reward", Tes::from_grains(pending)),
                    Field::new("deposit_time", format_time(record.deposit_time)),
                    Field::new("unlocks_at", format_time(record.lock_end_time)),
                    Field::new("last_claim_time", format_time(record.last_claim_time)),
                    Field::new("credentials_issued", record.credentials_issued),
                    Field::new("now", format_time(now)),
                ],
            );
            return Ok(());
        }
        StakeCmd::List => {
            let rows = stake_rows(&state.ledger, now)?;
            if rows.is_empty() {
                println!("No stake records.");
            } else {
                print_rows(ctx.format, &rows);
            }
            return Ok(());
        }
    }

    ctx.save(&state).await?;
    Ok(())
}

/// Make sure custody may pull `amount` from `account`. A larger or unlimited
/// allowance is left as it is.
fn ensure_custody_allowance(ledger: &mut StandardLedger, account: &AccountId, amount: u128) {
    let custody = *ledger.custody();
    if ledger.tokens().allowance(account, &custody) < amount {
        ledger.tokens_mut().approve(account, &custody, amount);
    }
}

fn stake_rows(ledger: &StandardLedger, now: u64) -> Result<Vec<StakeRow>, Box<dyn std::error::Error>> {
    let mut entries: Vec<_> = ledger.accounts().collect();
    entries.sort_by(|a, b| b.1.principal.cmp(&a.1.principal).then(a.0.cmp(b.0)));

    let mut rows = Vec::with_capacity(entries.len());
    for (account, record) in entries {
        rows.push(StakeRow {
            account: account.short(),
            principal: Tes::from_grains(record.principal).to_string(),
            state: record.state(now).to_string(),
            lock_end_time: record.lock_end_time,
            pending_reward: Tes::from_grains(ledger.pending_reward(account, now)?).to_string(),
            credentials: record.credentials_issued,
        });
    }
    Ok(rows)
}
