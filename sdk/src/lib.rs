//! Staking SDK - bootstrap of the staking program's reward vault
//!
//! This SDK provides:
//! - Program-derived address computation
//! - Submission of the program's `initialize` instruction
//! - Idempotent creation of the vault's reward token account
//! - A pipeline running the three in order

pub mod client;
pub mod error;
pub mod initialize;
pub mod pda;
pub mod pipeline;
pub mod token_account;
pub mod types;
pub mod vault;

// Re-export key types
pub use client::{LedgerClient, LedgerConfig, RpcLedger};
pub use error::{BootstrapError, Result};
pub use initialize::InitializationSubmitter;
pub use pda::{find_program_address, vault_address, VAULT_SEED};
pub use pipeline::{run_bootstrap, BootstrapReport, InitializeMode, Step, StepError};
pub use token_account::TokenAccountBootstrapper;
pub use types::*;
pub use vault::VaultState;
