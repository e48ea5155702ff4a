#![deny(missing_docs)]

//! Client-side helpers for stake pools: decoding the on-chain account data
//! and planning stake withdrawals across the pool's validators.
//!
//! Nothing in this crate performs network I/O. Account bytes, the stake
//! account rent exemption and the stake program's minimum delegation are
//! fetched by the caller and handed in.

pub mod error;
pub mod fee;
pub mod layout;
pub mod pda;
pub mod state;
pub mod withdraw;

// Export current sdk types for downstream users building with a different sdk
// version
pub use solana_program;
pub use {
    error::{LayoutError, WithdrawError},
    fee::{Fee, FutureEpochFee},
    state::{
        calc_lamports_withdraw_amount, calc_pool_tokens_for_deposit, decode_stake_pool,
        decode_validator_list, encode_stake_pool, encode_validator_list, AccountType, StakePool,
        StakeStatus, ValidatorList, ValidatorListHeader, ValidatorStakeInfo,
    },
    withdraw::{
        compare_by_lamports_desc, prepare_withdraw_accounts, prepare_withdraw_accounts_from_bytes,
        MinimumBalanceInputs, ValidatorAccount, ValidatorAccountComparator, ValidatorAccountKind,
        WithdrawAccount, WithdrawConfig, WithdrawMode, WithdrawPlan,
    },
};

/// Seed for deposit authority seed
const AUTHORITY_DEPOSIT: &[u8] = b"deposit";

/// Seed for withdraw authority seed
const AUTHORITY_WITHDRAW: &[u8] = b"withdraw";

/// Seed for transient stake account
const TRANSIENT_STAKE_SEED_PREFIX: &[u8] = b"transient";

/// Seed for ephemeral stake account
const EPHEMERAL_STAKE_SEED_PREFIX: &[u8] = b"ephemeral";

/// Minimum amount of staked lamports required in a validator stake account to
/// allow for merges without a mismatch on credits observed
pub const MINIMUM_ACTIVE_STAKE: u64 = solana_program::native_token::LAMPORTS_PER_SOL;

/// Get the minimum delegation required by a stake account in a stake pool
#[inline]
pub fn minimum_delegation(stake_program_minimum_delegation: u64) -> u64 {
    std::cmp::max(stake_program_minimum_delegation, MINIMUM_ACTIVE_STAKE)
}

solana_program::declare_id!("SP1s4uFeTAX9jsXXmwyDs1gxYYf7cdDZ8qHUHVxE1yr");
