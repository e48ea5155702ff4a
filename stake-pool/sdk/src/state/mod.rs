//! Stake pool account state, as decoded from on-chain data

mod layouts;

pub use layouts::{
    FeeLayout, FutureEpochFeeLayout, LockupLayout, StakePoolLayout, ValidatorListHeaderLayout,
    ValidatorListLayout, ValidatorStakeInfoLayout,
};

use {
    crate::{
        error::LayoutError,
        fee::{Fee, FutureEpochFee},
        layout::Layout,
    },
    num_derive::{FromPrimitive, ToPrimitive},
    solana_program::{pubkey::Pubkey, stake::state::Lockup},
};

/// Enum representing the account type managed by the program
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum AccountType {
    /// If the account has not been initialized, the enum will be 0
    #[default]
    Uninitialized,
    /// Stake pool
    StakePool,
    /// Validator stake list
    ValidatorList,
}

/// Initialized program details.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StakePool {
    /// Account type, must be `StakePool` currently
    pub account_type: AccountType,

    /// Manager authority, allows for updating the staker, manager, and fee
    /// account
    pub manager: Pubkey,

    /// Staker authority, allows for adding and removing validators, and
    /// managing stake distribution
    pub staker: Pubkey,

    /// Stake deposit authority
    pub stake_deposit_authority: Pubkey,

    /// Stake withdrawal authority bump seed
    pub stake_withdraw_bump_seed: u8,

    /// Validator stake list storage account
    pub validator_list: Pubkey,

    /// Reserve stake account, holds deactivated stake
    pub reserve_stake: Pubkey,

    /// Pool Mint
    pub pool_mint: Pubkey,

    /// Manager fee account
    pub manager_fee_account: Pubkey,

    /// Pool token program id
    pub token_program_id: Pubkey,

    /// Total stake under management.
    /// Note that if `last_update_epoch` does not match the current epoch then
    /// this field may not be accurate
    pub total_lamports: u64,

    /// Total supply of pool tokens (should always match the supply in the Pool
    /// Mint)
    pub pool_token_supply: u64,

    /// Last epoch the `total_lamports` field was updated
    pub last_update_epoch: u64,

    /// Lockup that all stakes in the pool must have
    pub lockup: Lockup,

    /// Fee taken as a proportion of rewards each epoch
    pub epoch_fee: Fee,

    /// Fee for next epoch
    pub next_epoch_fee: FutureEpochFee,

    /// Preferred deposit validator vote account pubkey
    pub preferred_deposit_validator_vote_address: Option<Pubkey>,

    /// Preferred withdraw validator vote account pubkey
    pub preferred_withdraw_validator_vote_address: Option<Pubkey>,

    /// Fee assessed on stake deposits
    pub stake_deposit_fee: Fee,

    /// Fee assessed on withdrawals
    pub stake_withdrawal_fee: Fee,

    /// Future stake withdrawal fee, to be set for the following epoch
    pub next_stake_withdrawal_fee: FutureEpochFee,

    /// Fees paid out to referrers on referred stake deposits.
    /// Expressed as a percentage (0 - 100) of deposit fees.
    pub stake_referral_fee: u8,

    /// Toggles whether the `DepositSol` instruction requires a signature from
    /// this `sol_deposit_authority`
    pub sol_deposit_authority: Option<Pubkey>,

    /// Fee assessed on SOL deposits
    pub sol_deposit_fee: Fee,

    /// Fees paid out to referrers on referred SOL deposits.
    /// Expressed as a percentage (0 - 100) of SOL deposit fees.
    pub sol_referral_fee: u8,

    /// Toggles whether the `WithdrawSol` instruction requires a signature from
    /// the `deposit_authority`
    pub sol_withdraw_authority: Option<Pubkey>,

    /// Fee assessed on SOL withdrawals
    pub sol_withdrawal_fee: Fee,

    /// Future SOL withdrawal fee, to be set for the following epoch
    pub next_sol_withdrawal_fee: FutureEpochFee,

    /// Last epoch's total pool tokens, used only for APR estimation
    pub last_epoch_pool_token_supply: u64,

    /// Last epoch's total lamports, used only for APR estimation
    pub last_epoch_total_lamports: u64,
}

impl StakePool {
    /// Pool tokens for `stake_lamports`, before narrowing to `u64`.
    ///
    /// An empty pool mints 1:1.
    pub(crate) fn pool_tokens_for_lamports(&self, stake_lamports: u64) -> Option<u128> {
        if self.total_lamports == 0 || self.pool_token_supply == 0 {
            return Some(stake_lamports as u128);
        }
        (stake_lamports as u128)
            .checked_mul(self.pool_token_supply as u128)?
            .checked_div(self.total_lamports as u128)
    }

    /// Calculate the pool tokens that should be minted for a deposit of
    /// `stake_lamports`
    #[inline]
    pub fn calc_pool_tokens_for_deposit(&self, stake_lamports: u64) -> Option<u64> {
        u64::try_from(self.pool_tokens_for_lamports(stake_lamports)?).ok()
    }

    /// Calculate lamports amount on withdrawal
    ///
    /// Returns 0 when the product is smaller than the supply, so a dust
    /// amount of pool tokens never rounds into a payout.
    #[inline]
    pub fn calc_lamports_withdraw_amount(&self, pool_tokens: u64) -> Option<u64> {
        let numerator = (pool_tokens as u128).checked_mul(self.total_lamports as u128)?;
        let denominator = self.pool_token_supply as u128;
        if numerator < denominator || denominator == 0 {
            Some(0)
        } else {
            u64::try_from(numerator.checked_div(denominator)?).ok()
        }
    }

    /// Calculate pool tokens to be deducted as stake withdrawal fees
    #[inline]
    pub fn calc_pool_tokens_stake_withdrawal_fee(&self, pool_tokens: u64) -> Option<u64> {
        u64::try_from(self.stake_withdrawal_fee.apply(pool_tokens)?).ok()
    }

    /// Calculate pool tokens to be deducted as SOL withdrawal fees
    #[inline]
    pub fn calc_pool_tokens_sol_withdrawal_fee(&self, pool_tokens: u64) -> Option<u64> {
        u64::try_from(self.sol_withdrawal_fee.apply(pool_tokens)?).ok()
    }

    /// Calculate pool tokens to be deducted as stake deposit fees
    #[inline]
    pub fn calc_pool_tokens_stake_deposit_fee(&self, pool_tokens_minted: u64) -> Option<u64> {
        u64::try_from(self.stake_deposit_fee.apply(pool_tokens_minted)?).ok()
    }

    /// Calculate pool tokens to be deducted as SOL deposit fees
    #[inline]
    pub fn calc_pool_tokens_sol_deposit_fee(&self, pool_tokens_minted: u64) -> Option<u64> {
        u64::try_from(self.sol_deposit_fee.apply(pool_tokens_minted)?).ok()
    }

    /// Calculate pool tokens to be deducted from deposit fees as referral fees
    #[inline]
    pub fn calc_pool_tokens_stake_referral_fee(&self, stake_deposit_fee: u64) -> Option<u64> {
        referral_share(stake_deposit_fee, self.stake_referral_fee)
    }

    /// Calculate pool tokens to be deducted from SOL deposit fees as referral
    /// fees
    #[inline]
    pub fn calc_pool_tokens_sol_referral_fee(&self, sol_deposit_fee: u64) -> Option<u64> {
        referral_share(sol_deposit_fee, self.sol_referral_fee)
    }

    /// Get the current value of pool tokens, rounded up
    #[inline]
    pub fn get_lamports_per_pool_token(&self) -> Option<u64> {
        let value = (self.total_lamports as u128)
            .checked_add(self.pool_token_supply as u128)?
            .checked_sub(1)?
            .checked_div(self.pool_token_supply as u128)?;
        u64::try_from(value).ok()
    }

    /// Check if `StakePool` is actually initialized as a stake pool
    pub fn is_valid(&self) -> bool {
        self.account_type == AccountType::StakePool
    }

    /// Check if `StakePool` is currently uninitialized
    pub fn is_uninitialized(&self) -> bool {
        self.account_type == AccountType::Uninitialized
    }
}

fn referral_share(fee: u64, percentage: u8) -> Option<u64> {
    u64::try_from(
        (fee as u128)
            .checked_mul(percentage as u128)?
            .checked_div(100u128)?,
    )
    .ok()
}

/// Calculate the pool tokens that should be minted for a deposit of
/// `stake_lamports` into `stake_pool`
pub fn calc_pool_tokens_for_deposit(stake_pool: &StakePool, stake_lamports: u64) -> Option<u64> {
    stake_pool.calc_pool_tokens_for_deposit(stake_lamports)
}

/// Calculate the lamports paid out when withdrawing `pool_tokens` from
/// `stake_pool`
pub fn calc_lamports_withdraw_amount(stake_pool: &StakePool, pool_tokens: u64) -> Option<u64> {
    stake_pool.calc_lamports_withdraw_amount(pool_tokens)
}

/// Status of the stake account in the validator list, for accounting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum StakeStatus {
    /// Stake account is active, there may be a transient stake as well
    #[default]
    Active,
    /// Only transient stake account exists, when a transient stake is
    /// deactivating during validator removal
    DeactivatingTransient,
    /// No more validator stake accounts exist, entry ready for removal during
    /// `UpdateStakePoolBalance`
    ReadyForRemoval,
    /// Only the validator stake account is deactivating, no transient stake
    /// account exists
    DeactivatingValidator,
    /// Both the transient and validator stake account are deactivating, when
    /// a validator is removed with a transient stake active
    DeactivatingAll,
}

/// Information about a validator in the pool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidatorStakeInfo {
    /// Amount of lamports on the validator stake account, including rent
    pub active_stake_lamports: u64,

    /// Amount of transient stake delegated to this validator
    pub transient_stake_lamports: u64,

    /// Last epoch the active and transient stake lamports fields were updated
    pub last_update_epoch: u64,

    /// Transient account seed suffix, used to derive the transient stake
    /// account address
    pub transient_seed_suffix: u64,

    /// Unused space, initially meant to specify the end of seed suffixes
    pub unused: u32,

    /// Validator account seed suffix, 0 meaning no suffix
    pub validator_seed_suffix: u32,

    /// Status of the validator stake account
    pub status: StakeStatus,

    /// Validator vote account address
    pub vote_account_address: Pubkey,
}

impl ValidatorStakeInfo {
    /// Encoded length in bytes
    pub const LEN: usize = 73;

    /// Get the total lamports on this validator (active and transient)
    pub fn stake_lamports(&self) -> Option<u64> {
        self.active_stake_lamports
            .checked_add(self.transient_stake_lamports)
    }

    /// Check that the validator is active, and so eligible for withdrawals
    pub fn is_active(&self) -> bool {
        self.status == StakeStatus::Active
    }
}

/// Data at the front of a `ValidatorList`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidatorListHeader {
    /// Account type, must be `ValidatorList` currently
    pub account_type: AccountType,

    /// Maximum allowable number of validators
    pub max_validators: u32,
}

impl ValidatorListHeader {
    /// Length of the header in bytes
    pub const LEN: usize = 1 + 4;

    /// Check if validator stake list is actually initialized as a validator
    /// stake list
    pub fn is_valid(&self) -> bool {
        self.account_type == AccountType::ValidatorList
    }
}

/// Storage list for all validator stake accounts in the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorList {
    /// Data outside of the validator list
    pub header: ValidatorListHeader,

    /// List of stake info for each validator in the pool
    pub validators: Vec<ValidatorStakeInfo>,
}

impl ValidatorList {
    /// Calculate the number of validator entries that fit in the provided
    /// account length
    pub fn calculate_max_validators(buffer_length: usize) -> usize {
        let header_size = ValidatorListHeader::LEN.saturating_add(4);
        buffer_length
            .saturating_sub(header_size)
            .saturating_div(ValidatorStakeInfo::LEN)
    }

    /// Check if contains validator with particular pubkey
    pub fn contains(&self, vote_account_address: &Pubkey) -> bool {
        self.find(vote_account_address).is_some()
    }

    /// Find a validator by vote account address
    pub fn find(&self, vote_account_address: &Pubkey) -> Option<&ValidatorStakeInfo> {
        self.validators
            .iter()
            .find(|x| x.vote_account_address == *vote_account_address)
    }

    /// Check if the list has any active stake
    pub fn has_active_stake(&self) -> bool {
        self.validators.iter().any(|x| x.active_stake_lamports > 0)
    }
}

/// Decode a `ValidatorList` account
pub fn decode_validator_list(data: &[u8]) -> Result<ValidatorList, LayoutError> {
    ValidatorListLayout::new().unpack(data)
}

/// Decode a `StakePool` account
pub fn decode_stake_pool(data: &[u8]) -> Result<StakePool, LayoutError> {
    StakePoolLayout::new().unpack(data)
}

/// Encode a `ValidatorList` into a buffer of exactly the required size
pub fn encode_validator_list(validator_list: &ValidatorList) -> Result<Vec<u8>, LayoutError> {
    ValidatorListLayout::new().pack(validator_list)
}

/// Encode a `StakePool` into a buffer of exactly the required size
pub fn encode_stake_pool(stake_pool: &StakePool) -> Result<Vec<u8>, LayoutError> {
    StakePoolLayout::new().pack(stake_pool)
}
