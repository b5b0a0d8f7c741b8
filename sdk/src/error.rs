//! Error types for the staking SDK

use solana_client::client_error::ClientError;
use solana_sdk::{
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    transaction::TransactionError,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no off-curve address found within {attempts} bump attempts")]
    DerivationExhausted { attempts: u16 },

    #[error("{count} seeds supplied, at most {max} allowed alongside the bump")]
    TooManySeeds { count: usize, max: usize },

    #[error("seed {index} is {len} bytes, exceeding the {max} byte limit")]
    SeedTooLong { index: usize, len: usize, max: usize },

    #[error("network error: {0}")]
    Network(Box<ClientError>),

    #[error("instruction {index} rejected by program: {error}")]
    ProgramRejected { index: u8, error: InstructionError },

    #[error("fee payer cannot cover the transaction: {0}")]
    InsufficientFunds(TransactionError),

    #[error("transaction failed: {0}")]
    TransactionFailed(TransactionError),

    #[error("transaction {signature} not confirmed within {waited:?}")]
    SubmissionTimeout { signature: Signature, waited: Duration },

    #[error("account {address} is not a usable holding account: {reason}")]
    InvalidHoldingAccount { address: Pubkey, reason: String },

    #[error("account {address} holds invalid data: {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },
}

impl BootstrapError {
    /// Short name of the error kind, for operator-facing reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DerivationExhausted { .. } => "DerivationExhausted",
            Self::TooManySeeds { .. } | Self::SeedTooLong { .. } => "InvalidSeeds",
            Self::Network(_) => "NetworkError",
            Self::ProgramRejected { .. } => "ProgramRejected",
            Self::InsufficientFunds(_) => "InsufficientFunds",
            Self::TransactionFailed(_) => "TransactionFailed",
            Self::SubmissionTimeout { .. } => "SubmissionTimeout",
            Self::InvalidHoldingAccount { .. } => "InvalidHoldingAccount",
            Self::InvalidAccountData { .. } => "InvalidAccountData",
        }
    }
}

impl From<TransactionError> for BootstrapError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InstructionError(index, error) => {
                Self::ProgramRejected { index, error }
            }
            TransactionError::InsufficientFundsForFee
            | TransactionError::InsufficientFundsForRent { .. }
            | TransactionError::AccountNotFound => Self::InsufficientFunds(err),
            other => Self::TransactionFailed(other),
        }
    }
}

impl From<ClientError> for BootstrapError {
    fn from(err: ClientError) -> Self {
        // Preflight failures and confirmed-but-failed sends both carry a
        // transaction error; everything else is transport.
        match err.get_transaction_error() {
            Some(tx_err) => tx_err.into(),
            None => Self::Network(Box::new(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
