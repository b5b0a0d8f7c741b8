//! Submission of the staking program's `initialize` instruction

use crate::{error::Result, LedgerClient};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    system_program,
    transaction::Transaction,
};
use std::sync::Arc;
use tracing::info;

/// Anchor discriminator of `initialize`: first 8 bytes of
/// `sha256("global:initialize")`.
pub fn initialize_discriminator() -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(b"global:initialize");
    let hash = hasher.finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

/// Builds, signs and confirms the vault `initialize` transaction.
///
/// No check is made for an existing vault: the program refuses a second
/// initialization and that refusal is returned as-is.
pub struct InitializationSubmitter<C: ?Sized> {
    client: Arc<C>,
    program_id: Pubkey,
}

impl<C: LedgerClient + ?Sized> InitializationSubmitter<C> {
    pub fn new(client: Arc<C>, program_id: Pubkey) -> Self {
        Self { client, program_id }
    }

    /// Build the instruction with accounts `vault`, `admin`, `system_program`.
    pub fn instruction(&self, vault: &Pubkey, admin: &Pubkey) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*vault, false), // Vault to create
                AccountMeta::new(*admin, true),  // Admin, pays rent
                AccountMeta::new_readonly(system_program::id(), false),
            ],
            data: initialize_discriminator().to_vec(),
        }
    }

    /// Initialize `vault`, signed and paid for by `authority`.
    pub async fn submit(&self, vault: &Pubkey, authority: &Keypair) -> Result<Signature> {
        let admin = authority.pubkey();
        info!(%vault, %admin, program = %self.program_id, "submitting initialize");

        let instruction = self.instruction(vault, &admin);
        let recent_blockhash = self.client.latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&admin),
            &[authority],
            recent_blockhash,
        );

        let signature = self.client.send_and_confirm(&transaction).await?;
        info!(%signature, %vault, "vault initialized");
        Ok(signature)
    }
}
