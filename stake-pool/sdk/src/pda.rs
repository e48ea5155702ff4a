//! Addresses derived from the stake pool program id

use {
    crate::{
        AUTHORITY_DEPOSIT, AUTHORITY_WITHDRAW, EPHEMERAL_STAKE_SEED_PREFIX,
        TRANSIENT_STAKE_SEED_PREFIX,
    },
    solana_program::pubkey::Pubkey,
    std::num::NonZeroU32,
};

/// Program address for `seeds`, dropping the bump seed
pub fn derive_address(program_id: &Pubkey, seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, program_id).0
}

/// Authority allowed to move stake out of the pool's stake accounts
pub fn withdraw_authority_address(program_id: &Pubkey, stake_pool_address: &Pubkey) -> Pubkey {
    derive_address(program_id, &[stake_pool_address.as_ref(), AUTHORITY_WITHDRAW])
}

/// Default stake deposit authority, used when the pool has no custom one
pub fn deposit_authority_address(program_id: &Pubkey, stake_pool_address: &Pubkey) -> Pubkey {
    derive_address(program_id, &[stake_pool_address.as_ref(), AUTHORITY_DEPOSIT])
}

/// Validator stake account for `vote_account_address`.
///
/// A `seed` of `None` gives the account the pool creates first for the
/// validator; other seeds give the ones recreated after removal.
pub fn validator_stake_address(
    program_id: &Pubkey,
    vote_account_address: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: Option<NonZeroU32>,
) -> Pubkey {
    match seed {
        Some(seed) => derive_address(
            program_id,
            &[
                vote_account_address.as_ref(),
                stake_pool_address.as_ref(),
                &seed.get().to_le_bytes(),
            ],
        ),
        None => derive_address(
            program_id,
            &[vote_account_address.as_ref(), stake_pool_address.as_ref()],
        ),
    }
}

/// Transient stake account holding stake on its way in or out of
/// `vote_account_address`
pub fn transient_stake_address(
    program_id: &Pubkey,
    vote_account_address: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: u64,
) -> Pubkey {
    derive_address(
        program_id,
        &[
            TRANSIENT_STAKE_SEED_PREFIX,
            vote_account_address.as_ref(),
            stake_pool_address.as_ref(),
            &seed.to_le_bytes(),
        ],
    )
}

/// Ephemeral stake account used while redelegating
pub fn ephemeral_stake_address(
    program_id: &Pubkey,
    stake_pool_address: &Pubkey,
    seed: u64,
) -> Pubkey {
    derive_address(
        program_id,
        &[
            EPHEMERAL_STAKE_SEED_PREFIX,
            stake_pool_address.as_ref(),
            &seed.to_le_bytes(),
        ],
    )
}
