//! Reward token holding account bootstrap

use crate::{
    error::{BootstrapError, Result},
    HoldingAccount, LedgerClient,
};
use solana_sdk::{
    account::Account,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use spl_token::{
    solana_program::program_pack::Pack,
    state::{Account as TokenAccount, AccountState},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Finds or creates the associated token account of an `(mint, owner)` pair.
///
/// Owners may be program-derived addresses; the associated address is still
/// well defined for them.
pub struct TokenAccountBootstrapper<C: ?Sized> {
    client: Arc<C>,
    token_program_id: Pubkey,
}

impl<C: LedgerClient + ?Sized> TokenAccountBootstrapper<C> {
    pub fn new(client: Arc<C>, token_program_id: Pubkey) -> Self {
        Self { client, token_program_id }
    }

    /// Associated token address for the pair. Pure, no I/O.
    pub fn address(&self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(owner, mint, &self.token_program_id)
    }

    /// Return the holding account for `(mint, owner)`, creating it with
    /// `payer` funding the rent when it does not exist yet.
    ///
    /// An existing account is returned without sending any transaction.
    pub async fn get_or_create(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
        payer: &Keypair,
    ) -> Result<HoldingAccount> {
        let address = self.address(mint, owner);

        if let Some(account) = self.client.get_account(&address).await? {
            debug!(%address, "holding account already exists");
            return self.describe(&address, &account, mint, owner, None);
        }

        info!(%address, %mint, %owner, "creating holding account");
        let instruction = create_associated_token_account_idempotent(
            &payer.pubkey(),
            owner,
            mint,
            &self.token_program_id,
        );
        let recent_blockhash = self.client.latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            &[payer],
            recent_blockhash,
        );
        let signature = self.client.send_and_confirm(&transaction).await?;
        info!(%signature, %address, "holding account created");

        let account = self.client.get_account(&address).await?.ok_or_else(|| {
            BootstrapError::InvalidHoldingAccount {
                address,
                reason: format!("not found after confirmed creation in {signature}"),
            }
        })?;
        self.describe(&address, &account, mint, owner, Some(signature))
    }

    fn describe(
        &self,
        address: &Pubkey,
        account: &Account,
        mint: &Pubkey,
        owner: &Pubkey,
        created_by: Option<Signature>,
    ) -> Result<HoldingAccount> {
        let invalid = |reason: String| BootstrapError::InvalidHoldingAccount {
            address: *address,
            reason,
        };

        if account.owner != self.token_program_id {
            return Err(invalid(format!("owned by {}", account.owner)));
        }
        // Token-2022 accounts carry extensions after the base layout
        if account.data.len() < TokenAccount::LEN {
            return Err(invalid(format!("{} bytes is too short", account.data.len())));
        }
        let token = TokenAccount::unpack_from_slice(&account.data[..TokenAccount::LEN])
            .map_err(|e| invalid(e.to_string()))?;
        if token.state == AccountState::Uninitialized {
            return Err(invalid("not initialized".to_string()));
        }
        if token.mint != *mint {
            return Err(invalid(format!("holds mint {}", token.mint)));
        }
        if token.owner != *owner {
            return Err(invalid(format!("belongs to {}", token.owner)));
        }

        Ok(HoldingAccount {
            address: *address,
            mint: token.mint,
            owner: token.owner,
            amount: token.amount,
            created_by,
        })
    }
}
