// crates/tessera-cli/src/commands/clock.rs
//
// `tessera clock {show, advance}`: inspect and move the ledger clock.

use clap::Subcommand;

use super::{format_time, Context};
use crate::output::{print_fields, Field};

/// Clock subcommands.
#[derive(Debug, Subcommand)]
pub enum ClockCmd {
    /// Show the current ledger time.
    Show,
    /// Move the simulated clock forward (manual clock mode only).
    Advance {
        /// Seconds to advance.
        secs: u64,
    },
}

/// Run the clock subcommand.
pub async fn run(ctx: &Context, cmd: &ClockCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = ctx.load().await?;

    match cmd {
        ClockCmd::Show => {
            print_fields(
                ctx.format,
                &[
                    Field::new("mode", format!("{:?}", state.clock_mode).to_lowercase()),
                    Field::new("now", format_time(state.now())),
                    Field::new(
                        "last_ledger_timestamp",
                        format_time(state.ledger.last_timestamp()),
                    ),
                ],
            );
        }
        ClockCmd::Advance { secs } => {
            let now = state.advance(*secs)?;
            ctx.save(&state).await?;
            tracing::info!(secs, now, "Clock advanced");
            println!("Clock advanced by {}s, now {}", secs, format_time(now));
        }
    }

    Ok(())
}
