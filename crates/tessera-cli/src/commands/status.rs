// crates/tessera-cli/src/commands/status.rs
//
// `tessera status`: summary of the deployed ledger.

use super::{format_time, Context};
use crate::output::{print_fields, Field};
use tessera_core::traits::FungibleLedger;
use tessera_economics::Tes;

/// Run the status command.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let state = ctx.load().await?;
    let ledger = &state.ledger;
    let tokens = ledger.tokens();
    let policy = ledger.policy();

    let custody_balance = tokens.balance_of(ledger.custody());
    let principal = ledger.total_principal();
    let stakers = ledger.accounts().filter(|(_, r)| r.principal > 0).count();

    print_fields(
        ctx.format,
        &[
            Field::new("version", env!("CARGO_PKG_VERSION")),
            Field::new("state_file", ctx.state_path.display()),
            Field::new("created_at", state.created_at.to_rfc3339()),
            Field::new("now", format_time(state.now())),
            Field::new("token", format!("{} ({})", tokens.name(), tokens.symbol())),
            Field::new("total_supply", Tes::from_grains(tokens.total_supply())),
            Field::new("custody", ledger.custody()),
            Field::new("custody_balance", Tes::from_grains(custody_balance)),
            Field::new("total_staked", Tes::from_grains(principal)),
            Field::new("reward_pool", Tes::from_grains(ledger.reward_pool())),
            Field::new("stakers", stakers),
            Field::new("credentials_issued", ledger.credentials().total_issued()),
            Field::new("next_credential", ledger.credentials().next_id()),
            Field::new("lock_duration_secs", policy.lock_duration_secs),
            Field::new("apr_bps", policy.apr_bps),
            Field::new("certificate_threshold", Tes::from_grains(policy.certificate_threshold)),
            Field::new("lock_renewal", format!("{:?}", policy.lock_renewal)),
            Field::new("credential_issuance", format!("{:?}", policy.credential_issuance)),
            Field::new("reward_payout", format!("{:?}", policy.reward_payout)),
        ],
    );

    Ok(())
}
