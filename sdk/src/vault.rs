//! On-chain vault record of the staking program

use crate::error::{BootstrapError, Result};
use crate::LedgerClient;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Vault account data, written as zeros by `initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct VaultState {
    pub staked_count: u32,
    pub total_reward: u64,
}

impl VaultState {
    /// Discriminator + fields, the space the program allocates.
    pub const ACCOUNT_LEN: usize = 8 + 4 + 8;

    pub fn discriminator() -> [u8; 8] {
        let hash = Sha256::digest(b"account:Vault");
        let mut discriminator = [0u8; 8];
        discriminator.copy_from_slice(&hash[..8]);
        discriminator
    }

    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let invalid = |reason: String| BootstrapError::InvalidAccountData {
            address: *address,
            reason,
        };

        let (discriminator, mut body) = data
            .split_first_chunk::<8>()
            .ok_or_else(|| invalid(format!("{} bytes is too short", data.len())))?;
        if *discriminator != Self::discriminator() {
            return Err(invalid("not a vault account".to_string()));
        }
        Self::deserialize(&mut body).map_err(|e| invalid(e.to_string()))
    }

    /// Account data as the program lays it out.
    pub fn to_account_data(&self) -> std::io::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::ACCOUNT_LEN);
        data.extend_from_slice(&Self::discriminator());
        BorshSerialize::serialize(self, &mut data)?;
        Ok(data)
    }
}

/// Read and decode the vault record; `None` if the vault is not initialized.
pub async fn fetch_vault_state<C>(client: &C, vault: &Pubkey) -> Result<Option<VaultState>>
where
    C: LedgerClient + ?Sized,
{
    match client.get_account(vault).await? {
        Some(account) => VaultState::decode(vault, &account.data).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fresh_vault() {
        let address = Pubkey::new_unique();
        let data = VaultState::default().to_account_data().unwrap();
        assert_eq!(data.len(), VaultState::ACCOUNT_LEN);
        assert_eq!(VaultState::decode(&address, &data).unwrap(), VaultState::default());
    }

    #[test]
    fn test_decode_rejects_foreign_data() {
        let address = Pubkey::new_unique();

        let err = VaultState::decode(&address, &[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), "InvalidAccountData");

        let mut data = VaultState { staked_count: 3, total_reward: 21 }.to_account_data().unwrap();
        data[0] ^= 0xff;
        assert!(VaultState::decode(&address, &data).is_err());
    }

    #[test]
    fn test_borsh_layout_matches_program() {
        let state = VaultState { staked_count: 2, total_reward: 7_000_000_000 };
        let data = state.to_account_data().unwrap();
        assert_eq!(data.len(), VaultState::ACCOUNT_LEN);
        assert_eq!(&data[..8], &VaultState::discriminator());
        assert_eq!(&data[8..12], &2u32.to_le_bytes());
        assert_eq!(&data[12..], &7_000_000_000u64.to_le_bytes());
        assert_eq!(VaultState::decode(&Pubkey::new_unique(), &data).unwrap(), state);
    }
}
