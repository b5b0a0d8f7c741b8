//! Vault bootstrap binary

use anyhow::Result;
use clap::Parser;
use staking_sdk::InitializeMode;
use tracing::info;
use vault_bootstrap::{run, Config};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Skip `initialize` when the vault already exists
    #[arg(long)]
    skip_if_initialized: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(args.config.as_deref())?;
    info!("RPC URL: {}", config.rpc_url);
    info!("Program: {}", config.program_id);
    info!("Reward mint: {}", config.reward_mint);

    let mode = if args.skip_if_initialized {
        InitializeMode::SkipIfInitialized
    } else {
        InitializeMode::Always
    };

    let report = run(&config, mode).await?;

    match report.initialize_signature {
        Some(signature) => info!("initialize signature: {}", signature),
        None => info!("vault was already initialized"),
    }
    info!("vault: {} (bump {})", report.vault, report.bump);
    info!("reward account: {}", report.holding.address);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
