//! Vault Bootstrap
//!
//! One-shot operator tool: derives the staking vault, initializes it, and
//! makes sure the vault owns a reward token account.

pub mod config;

pub use config::Config;

use anyhow::{Context, Result};
use solana_sdk::signer::Signer;
use staking_sdk::{run_bootstrap, BootstrapReport, InitializeMode, RpcLedger};
use std::sync::Arc;
use tracing::info;

/// Run the bootstrap described by `config`.
///
/// The authority keypair is loaded here and dropped when the run ends.
pub async fn run(config: &Config, mode: InitializeMode) -> Result<BootstrapReport> {
    let program = config.program_config()?;
    let authority = config.load_keypair().context("Failed to load authority keypair")?;
    let ledger = Arc::new(RpcLedger::new(config.ledger_config()?));
    info!(
        rpc_url = %ledger.url(),
        program = %program.program_id,
        authority = %authority.pubkey(),
        "starting vault bootstrap"
    );

    let report = run_bootstrap(ledger, &program, &authority, mode).await?;
    Ok(report)
}
