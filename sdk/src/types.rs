//! Common types used across the staking SDK

use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// Identifiers of the deployment being bootstrapped.
///
/// Built once from operator configuration and handed to each component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    /// The staking program
    pub program_id: Pubkey,
    /// Mint of the reward token paid out of the vault
    pub reward_mint: Pubkey,
    /// Token program that owns `reward_mint`
    pub token_program_id: Pubkey,
}

impl ProgramConfig {
    pub fn new(program_id: Pubkey, reward_mint: Pubkey) -> Self {
        Self {
            program_id,
            reward_mint,
            token_program_id: spl_token::id(),
        }
    }
}

/// Token account holding `mint` on behalf of `owner`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingAccount {
    #[serde(with = "display")]
    pub address: Pubkey,
    #[serde(with = "display")]
    pub mint: Pubkey,
    #[serde(with = "display")]
    pub owner: Pubkey,
    pub amount: u64,
    /// Creation transaction, when this call created the account
    #[serde(with = "option_display")]
    pub created_by: Option<Signature>,
}

// Addresses and signatures serialize in their base58 display form
pub(crate) mod display {
    use serde::Serializer;
    use std::fmt::Display;

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        serializer.collect_str(value)
    }
}

pub(crate) mod option_display {
    use serde::Serializer;
    use std::fmt::Display;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }
}
