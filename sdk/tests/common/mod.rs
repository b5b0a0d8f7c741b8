//! In-memory ledger that runs the staking program's `initialize` and the
//! associated token account program well enough for bootstrap tests.

#![allow(dead_code)]

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use spl_token::{
    solana_program::{program_option::COption, program_pack::Pack},
    state::{Account as TokenAccount, AccountState},
};
use staking_sdk::{BootstrapError, LedgerClient, Result, VaultState};
use std::{collections::HashMap, sync::Mutex};

#[derive(Clone)]
pub enum Failure {
    Transaction(TransactionError),
    Network,
}

pub struct MemoryLedger {
    program_id: Pubkey,
    accounts: Mutex<HashMap<Pubkey, Account>>,
    sent: Mutex<Vec<Signature>>,
    failure: Mutex<Option<Failure>>,
}

impl MemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every following send fail.
    pub fn fail_sends(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn insert(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.lock().unwrap().get(address).cloned()
    }

    pub fn sent(&self) -> Vec<Signature> {
        self.sent.lock().unwrap().clone()
    }

    pub fn initialized_vault(&self) -> Account {
        Account {
            lamports: 1_002_240,
            data: VaultState::default().to_account_data().unwrap(),
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        }
    }

    fn execute(&self, transaction: &Transaction) -> std::result::Result<(), TransactionError> {
        transaction
            .verify()
            .map_err(|_| TransactionError::SignatureFailure)?;

        let message = &transaction.message;
        let mut accounts = self.accounts.lock().unwrap();
        let mut staged = accounts.clone();

        for (index, ix) in message.instructions.iter().enumerate() {
            let key = |position: usize| message.account_keys[ix.accounts[position] as usize];
            let program = message.account_keys[ix.program_id_index as usize];

            if program == self.program_id {
                let vault = key(0);
                if staged.contains_key(&vault) {
                    // System program refuses to create an account already in use
                    return Err(TransactionError::InstructionError(
                        index as u8,
                        InstructionError::Custom(0),
                    ));
                }
                staged.insert(vault, self.initialized_vault());
            } else if program == spl_associated_token_account::id() {
                let (address, wallet, mint, token_program) = (key(1), key(2), key(3), key(5));
                staged.entry(address).or_insert_with(|| {
                    token_account(mint, wallet, token_program)
                });
            } else {
                return Err(TransactionError::InstructionError(
                    index as u8,
                    InstructionError::IncorrectProgramId,
                ));
            }
        }

        *accounts = staged;
        Ok(())
    }
}

pub fn token_account(mint: Pubkey, owner: Pubkey, token_program: Pubkey) -> Account {
    let mut data = vec![0u8; TokenAccount::LEN];
    TokenAccount {
        mint,
        owner,
        amount: 0,
        delegate: COption::None,
        state: AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    }
    .pack_into_slice(&mut data);
    Account {
        lamports: 2_039_280,
        data,
        owner: token_program,
        executable: false,
        rent_epoch: 0,
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self.account(address))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(Failure::Transaction(err)) => return Err(err.into()),
            Some(Failure::Network) => {
                let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "request timed out");
                return Err(BootstrapError::from(ClientError::from(io)));
            }
            None => {}
        }

        self.execute(transaction)?;
        let signature = transaction.signatures[0];
        self.sent.lock().unwrap().push(signature);
        Ok(signature)
    }
}
