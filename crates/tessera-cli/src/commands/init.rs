// crates/tessera-cli/src/commands/init.rs
//
// `tessera init`: deploy a fresh ledger and write the state file.

use tessera_core::clock::{Clock, SystemClock};
use tessera_economics::{deploy, Tes};

use super::{format_time, Context};
use crate::output::{print_fields, Field};
use crate::store::LedgerState;

/// Run `tessera init`.
pub async fn run(ctx: &Context, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.state_path.exists() && !force {
        return Err(format!(
            "ledger state already exists at {} (pass --force to overwrite)",
            ctx.state_path.display()
        )
        .into());
    }

    let admin = ctx.admin()?;
    let deploy_config = ctx.config.deploy_config()?;
    let ledger = deploy(&admin, &deploy_config)?;

    // The simulated clock starts at wall-clock time so timestamps read sensibly.
    let start = SystemClock.now();
    let state = LedgerState::new(ledger, ctx.config.clock, start);
    ctx.save(&state).await?;

    tracing::info!("Initialized ledger state at {}", ctx.state_path.display());

    let ledger = &state.ledger;
    let tokens = ledger.tokens();
    print_fields(
        ctx.format,
        &[
            Field::new("state_file", ctx.state_path.display()),
            Field::new("admin", admin),
            Field::new("custody", ledger.custody()),
            Field::new("token", format!("{} ({})", tokens.name(), tokens.symbol())),
            Field::new("total_supply", Tes::from_grains(tokens.total_supply())),
            Field::new("reward_pool", Tes::from_grains(deploy_config.reward_pool)),
            Field::new("lock_duration_secs", ledger.policy().lock_duration_secs),
            Field::new("apr_bps", ledger.policy().apr_bps),
            Field::new(
                "certificate_threshold",
                Tes::from_grains(ledger.policy().certificate_threshold),
            ),
            Field::new("clock", format!("{:?}", state.clock_mode).to_lowercase()),
            Field::new("now", format_time(state.now())),
        ],
    );

    Ok(())
}
