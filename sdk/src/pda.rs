//! Program-derived address computation
//!
//! Addresses are SHA-256 hashes of `seeds ‖ bump ‖ program_id ‖ marker` that
//! fall off the ed25519 curve, so no private key can ever sign for them.

use crate::error::{BootstrapError, Result};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Maximum number of seeds, including the bump seed
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes
pub const MAX_SEED_LEN: usize = 32;

/// Seed of the staking program's vault account
pub const VAULT_SEED: &[u8] = b"vault";

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Find the canonical `(address, bump)` for `seeds` under `program_id`.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address_with(seeds, program_id, Pubkey::is_on_curve)
}

/// Derive the staking vault address and its bump.
pub fn vault_address(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    find_program_address(&[VAULT_SEED], program_id)
}

/// Same search as [`find_program_address`], with the curve test supplied by
/// the caller.
///
/// Bumps are tried from 255 down to 1, matching the runtime's search so the
/// bump handed to the program is the one it recomputes on-chain.
pub fn find_program_address_with<F>(
    seeds: &[&[u8]],
    program_id: &Pubkey,
    is_on_curve: F,
) -> Result<(Pubkey, u8)>
where
    F: Fn(&Pubkey) -> bool,
{
    check_seeds(seeds)?;

    let mut attempts: u16 = 0;
    for bump in (1..=u8::MAX).rev() {
        attempts += 1;
        let candidate = hash_candidate(seeds, bump, program_id);
        if !is_on_curve(&candidate) {
            return Ok((candidate, bump));
        }
    }

    Err(BootstrapError::DerivationExhausted { attempts })
}

/// Compute the address for an already-known bump.
///
/// Returns `None` when the candidate lies on the curve and is therefore not a
/// valid program address.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Pubkey,
) -> Result<Option<Pubkey>> {
    check_seeds(seeds)?;
    let candidate = hash_candidate(seeds, bump, program_id);
    Ok((!candidate.is_on_curve()).then_some(candidate))
}

fn check_seeds(seeds: &[&[u8]]) -> Result<()> {
    if seeds.len() >= MAX_SEEDS {
        return Err(BootstrapError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS - 1,
        });
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(BootstrapError::SeedTooLong {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }
    Ok(())
}

fn hash_candidate(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    Pubkey::new_from_array(hasher.finalize().into())
}
