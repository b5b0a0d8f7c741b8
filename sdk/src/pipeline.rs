//! Derive → initialize → reward-account bootstrap, run to completion or abort

use crate::{
    error::BootstrapError,
    pda,
    vault::{fetch_vault_state, VaultState},
    HoldingAccount, InitializationSubmitter, LedgerClient, ProgramConfig,
    TokenAccountBootstrapper,
};
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::{Keypair, Signature}};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{info, warn};

/// Stage of the bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DeriveVault,
    InitializeVault,
    RewardAccount,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::DeriveVault => write!(f, "derive vault address"),
            Step::InitializeVault => write!(f, "initialize vault"),
            Step::RewardAccount => write!(f, "bootstrap reward account"),
        }
    }
}

/// A bootstrap failure and the step it aborted.
#[derive(Debug, Error)]
#[error("{step} failed ({}): {source}", .source.kind())]
pub struct StepError {
    pub step: Step,
    #[source]
    pub source: BootstrapError,
}

trait AtStep<T> {
    fn at(self, step: Step) -> Result<T, StepError>;
}

impl<T> AtStep<T> for Result<T, BootstrapError> {
    fn at(self, step: Step) -> Result<T, StepError> {
        self.map_err(|source| StepError { step, source })
    }
}

/// Whether to submit `initialize` when the vault already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitializeMode {
    /// Always submit; a second run fails with the program's rejection.
    #[default]
    Always,
    /// Look the vault up first and skip submission when it is present.
    SkipIfInitialized,
}

/// Outputs of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    #[serde(with = "crate::types::display")]
    pub vault: Pubkey,
    pub bump: u8,
    /// `None` when the vault was already initialized and skipped
    #[serde(with = "crate::types::option_display")]
    pub initialize_signature: Option<Signature>,
    pub vault_state: Option<VaultState>,
    pub holding: HoldingAccount,
}

/// Run the whole bootstrap against `client` with `authority` as signer and
/// fee payer.
pub async fn run_bootstrap<C>(
    client: Arc<C>,
    program: &ProgramConfig,
    authority: &Keypair,
    mode: InitializeMode,
) -> Result<BootstrapReport, StepError>
where
    C: LedgerClient + ?Sized,
{
    let (vault, bump) = pda::vault_address(&program.program_id).at(Step::DeriveVault)?;
    info!(%vault, bump, "derived vault address");

    let already_initialized = match mode {
        InitializeMode::Always => false,
        InitializeMode::SkipIfInitialized => client
            .get_account(&vault)
            .await
            .at(Step::InitializeVault)?
            .is_some(),
    };

    let initialize_signature = if already_initialized {
        warn!(%vault, "vault already initialized, skipping initialize");
        None
    } else {
        let submitter = InitializationSubmitter::new(Arc::clone(&client), program.program_id);
        Some(
            submitter
                .submit(&vault, authority)
                .await
                .at(Step::InitializeVault)?,
        )
    };

    let vault_state = fetch_vault_state(client.as_ref(), &vault)
        .await
        .at(Step::InitializeVault)?;

    let bootstrapper = TokenAccountBootstrapper::new(client, program.token_program_id);
    let holding = bootstrapper
        .get_or_create(&program.reward_mint, &vault, authority)
        .await
        .at(Step::RewardAccount)?;
    info!(address = %holding.address, amount = holding.amount, "reward account ready");

    Ok(BootstrapReport {
        vault,
        bump,
        initialize_signature,
        vault_state,
        holding,
    })
}
