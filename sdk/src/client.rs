//! Ledger RPC interface used by the bootstrap components

use crate::error::{BootstrapError, Result};
use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{self, Transaction, TransactionError},
};
use std::{
    future::Future,
    time::{Duration, Instant},
};
use tracing::{debug, trace};

/// Minimal view of the ledger needed to bootstrap the vault.
///
/// Every call is awaited to completion before the next one starts; callers
/// never issue concurrent requests through the same client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch an account, `None` when it does not exist.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Submit a signed transaction and wait until it reaches the configured
    /// commitment.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}

/// Connection settings for [`RpcLedger`]
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    pub skip_preflight: bool,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// How long to wait for a sent transaction to reach `commitment`
    pub confirm_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: CommitmentConfig::confirmed(),
            skip_preflight: true,
            request_timeout: Duration::from_secs(30),
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// [`LedgerClient`] backed by a JSON-RPC endpoint
pub struct RpcLedger {
    rpc: RpcClient,
    config: LedgerConfig,
}

impl RpcLedger {
    pub fn new(config: LedgerConfig) -> Self {
        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.request_timeout,
            config.commitment,
        );
        Self { rpc, config }
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    fn send_config(&self) -> RpcSendTransactionConfig {
        RpcSendTransactionConfig {
            skip_preflight: self.config.skip_preflight,
            preflight_commitment: Some(self.config.commitment.commitment),
            ..RpcSendTransactionConfig::default()
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.config.commitment)
            .await?;
        Ok(response.value)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        // Skipped preflight never reports an unfunded payer
        if let Some(payer) = transaction.message.account_keys.first() {
            let fee = self.rpc.get_fee_for_message(&transaction.message).await?;
            let balance = self
                .rpc
                .get_balance_with_commitment(payer, self.config.commitment)
                .await?
                .value;
            ensure_fee_covered(balance, fee)?;
        }

        let signature = self
            .rpc
            .send_transaction_with_config(transaction, self.send_config())
            .await?;
        debug!(%signature, "transaction sent, awaiting confirmation");

        let commitment = self.config.commitment;
        await_confirmation(
            signature,
            self.config.confirm_timeout,
            self.config.poll_interval,
            || async move {
                Ok(self
                    .rpc
                    .get_signature_status_with_commitment(&signature, commitment)
                    .await?)
            },
        )
        .await
    }
}

/// Fails with `InsufficientFunds` when `balance` cannot pay `fee` lamports.
fn ensure_fee_covered(balance: u64, fee: u64) -> Result<()> {
    if balance < fee {
        debug!(balance, fee, "fee payer cannot cover the transaction fee");
        return Err(BootstrapError::InsufficientFunds(
            TransactionError::InsufficientFundsForFee,
        ));
    }
    Ok(())
}

/// Poll `fetch_status` until the transaction resolves or `timeout` elapses.
async fn await_confirmation<F, Fut>(
    signature: Signature,
    timeout: Duration,
    poll_interval: Duration,
    mut fetch_status: F,
) -> Result<Signature>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<transaction::Result<()>>>>,
{
    let started = Instant::now();
    loop {
        match fetch_status().await? {
            Some(Ok(())) => return Ok(signature),
            Some(Err(err)) => return Err(err.into()),
            None => trace!(%signature, "not yet confirmed"),
        }

        let waited = started.elapsed();
        if waited >= timeout {
            return Err(BootstrapError::SubmissionTimeout { signature, waited });
        }
        tokio::time::sleep(poll_interval).await;
    }
}
