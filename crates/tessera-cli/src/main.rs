// crates/tessera-cli/src/main.rs
//
// CLI entrypoint for the Tessera staking ledger developer tools.
//
// Every command loads the ledger from the state file, applies one operation
// at the ledger clock's current time, and writes the state back only if the
// operation succeeded.

mod accounts;
mod commands;
mod config;
mod output;
mod store;

use clap::{Parser, Subcommand};
use commands::clock::ClockCmd;
use commands::credential::CredentialCmd;
use commands::stake::StakeCmd;
use commands::token::TokenCmd;
use commands::wallet::WalletCmd;
use commands::Context;
use config::CliConfig;
use output::OutputFormat;

/// Tessera CLI: token faucet, time-locked staking, and stake credentials.
///
/// A local simulation tool. Nothing is signed: every command acts as the
/// account named on its command line, and wallet keys only supply account ids.
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    version = "0.1.0",
    about = "Tessera CLI for the staking ledger (local simulation, no signing): deposit, withdraw, earn rewards, collect credentials",
    long_about = "Tessera CLI for the staking ledger: deposit, withdraw, earn rewards, collect credentials.\n\n\
                  This is a local simulation tool with no transaction signing. Every command acts as \
                  the account named on its command line; wallet keys only supply account ids."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.tessera/config.toml")]
    config: String,

    /// Path to the ledger state file. Defaults to `<data_dir>/state.json`.
    #[arg(long, global = true)]
    state: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Deploy a fresh token, credential registry, and staking ledger.
    Init {
        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },

    /// Wallet management: create, import, show.
    #[command(subcommand)]
    Wallet(WalletCmd),

    /// Token operations: balance, faucet, mint, transfer, approve.
    #[command(subcommand)]
    Token(TokenCmd),

    /// Staking: deposit, withdraw, claim, info, list.
    #[command(subcommand)]
    Stake(StakeCmd),

    /// Credential queries: owner-of, balance.
    #[command(subcommand)]
    Credential(CredentialCmd),

    /// Ledger clock: show, advance.
    #[command(subcommand)]
    Clock(ClockCmd),

    /// Display a summary of the deployed ledger.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration first so its log level can seed the filter.
    let loaded = CliConfig::load(&cli.config);
    let config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => CliConfig::default(),
    };

    // Initialize tracing subscriber for structured logging. RUST_LOG wins
    // over the configured level. Logs go to stderr to keep --json clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::debug!("Loaded configuration from {}", cli.config),
        Err(_) if !config::expand_tilde(&cli.config).exists() => {
            tracing::debug!("No config file at {}. Using defaults.", cli.config)
        }
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            cli.config,
            e
        ),
    }

    let state_path = store::state_path(&config.data_dir(), cli.state.as_deref());
    let ctx = Context {
        config,
        state_path,
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        },
    };

    match &cli.command {
        Commands::Init { force } => commands::init::run(&ctx, *force).await?,
        Commands::Wallet(cmd) => commands::wallet::run(&ctx, cmd).await?,
        Commands::Token(cmd) => commands::token::run(&ctx, cmd).await?,
        Commands::Stake(cmd) => commands::stake::run(&ctx, cmd).await?,
        Commands::Credential(cmd) => commands::credential::run(&ctx, cmd).await?,
        Commands::Clock(cmd) => commands::clock::run(&ctx, cmd).await?,
        Commands::Status => commands::status::run(&ctx).await?,
    }

    Ok(())
}
