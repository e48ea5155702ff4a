//! Picking the pool's stake accounts to withdraw a given amount of pool
//! tokens from

use {
    crate::{
        error::WithdrawError,
        id, minimum_delegation,
        pda::{transient_stake_address, validator_stake_address},
        state::{decode_validator_list, StakePool, ValidatorList},
    },
    log::{debug, trace},
    solana_program::pubkey::Pubkey,
    std::{cmp::Ordering, fmt, num::NonZeroU32},
};

/// Kind of stake account a withdrawal can draw from, in the order they are
/// drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatorAccountKind {
    /// Active stake of the pool's preferred withdraw validator
    Preferred,
    /// Active stake of any other validator
    Active,
    /// Transient stake
    Transient,
}

impl ValidatorAccountKind {
    const DRAW_ORDER: [Self; 3] = [Self::Preferred, Self::Active, Self::Transient];
}

/// A stake account with lamports available for withdrawal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorAccount {
    /// Kind of stake held
    pub kind: ValidatorAccountKind,
    /// Validator the stake is delegated to
    pub vote_address: Pubkey,
    /// Stake account address
    pub stake_address: Pubkey,
    /// Lamports that can be taken out of the account
    pub lamports: u64,
}

/// One stake account to withdraw from, and how many pool tokens to burn for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawAccount {
    /// Stake account to split the withdrawal from
    pub stake_address: Pubkey,
    /// Validator the stake account is delegated to, if any
    pub vote_address: Option<Pubkey>,
    /// Pool tokens to burn
    pub pool_amount: u64,
}

/// Result of planning a withdrawal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WithdrawPlan {
    /// The accounts cover the whole amount
    Complete(Vec<WithdrawAccount>),
    /// The accounts cover `delayed_amount`, leaving `remaining_amount` for
    /// another withdrawal path
    Partial {
        /// Accounts to withdraw from
        withdraw_accounts: Vec<WithdrawAccount>,
        /// Pool tokens covered by `withdraw_accounts`
        delayed_amount: u64,
        /// Pool tokens left uncovered
        remaining_amount: u64,
    },
}

impl WithdrawPlan {
    /// Accounts to withdraw from, in order
    pub fn withdraw_accounts(&self) -> &[WithdrawAccount] {
        match self {
            Self::Complete(withdraw_accounts) | Self::Partial {
                withdraw_accounts, ..
            } => withdraw_accounts,
        }
    }

    /// Consume the plan, keeping the accounts
    pub fn into_withdraw_accounts(self) -> Vec<WithdrawAccount> {
        match self {
            Self::Complete(withdraw_accounts) | Self::Partial {
                withdraw_accounts, ..
            } => withdraw_accounts,
        }
    }

    /// Pool tokens covered by the stake accounts
    pub fn delayed_amount(&self) -> u64 {
        match self {
            Self::Complete(_) => self.total_pool_amount(),
            Self::Partial { delayed_amount, .. } => *delayed_amount,
        }
    }

    /// Pool tokens the stake accounts could not cover
    pub fn remaining_amount(&self) -> u64 {
        match self {
            Self::Complete(_) => 0,
            Self::Partial {
                remaining_amount, ..
            } => *remaining_amount,
        }
    }

    /// Sum of the pool amounts of every account
    pub fn total_pool_amount(&self) -> u64 {
        self.withdraw_accounts()
            .iter()
            .fold(0u64, |total, account| {
                total.saturating_add(account.pool_amount)
            })
    }
}

/// Whether a withdrawal may be only partly covered by stake accounts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WithdrawMode {
    /// Fail with [`WithdrawError::InsufficientFunds`] on a shortfall, returning
    /// [`WithdrawPlan::Complete`] otherwise
    #[default]
    Complete,
    /// Always return [`WithdrawPlan::Partial`], reporting any shortfall
    AllowPartial,
}

/// Cluster values that bound how much stake must stay in each account
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinimumBalanceInputs {
    /// Rent exemption minimum of a stake account
    pub rent_exemption_minimum: u64,
    /// Minimum delegation of the stake program
    pub stake_minimum_delegation: u64,
}

impl MinimumBalanceInputs {
    /// Lamports a validator stake account must keep
    pub fn min_balance(&self) -> Option<u64> {
        self.rent_exemption_minimum
            .checked_add(minimum_delegation(self.stake_minimum_delegation))
    }
}

/// Ordering of candidate accounts within each kind
pub type ValidatorAccountComparator = fn(&ValidatorAccount, &ValidatorAccount) -> Ordering;

/// Largest balance first
pub fn compare_by_lamports_desc(a: &ValidatorAccount, b: &ValidatorAccount) -> Ordering {
    b.lamports.cmp(&a.lamports)
}

/// Settings for [`prepare_withdraw_accounts`]
#[derive(Clone)]
pub struct WithdrawConfig {
    /// Stake pool program the stake addresses are derived from
    pub program_id: Pubkey,
    /// Minimum balance inputs fetched from the cluster
    pub minimum_balance: MinimumBalanceInputs,
    /// Candidate ordering, replacing the default entirely
    pub compare: ValidatorAccountComparator,
    /// Do not gross up amounts for the withdrawal fee
    pub skip_fee: bool,
}

impl Default for WithdrawConfig {
    fn default() -> Self {
        Self {
            program_id: id(),
            minimum_balance: MinimumBalanceInputs::default(),
            compare: compare_by_lamports_desc,
            skip_fee: false,
        }
    }
}

impl fmt::Debug for WithdrawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithdrawConfig")
            .field("program_id", &self.program_id)
            .field("minimum_balance", &self.minimum_balance)
            .field("skip_fee", &self.skip_fee)
            .finish_non_exhaustive()
    }
}

impl WithdrawConfig {
    /// Use another stake pool program
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Set the minimum balance inputs
    pub fn with_minimum_balance(mut self, minimum_balance: MinimumBalanceInputs) -> Self {
        self.minimum_balance = minimum_balance;
        self
    }

    /// Order candidates with `compare`
    pub fn with_comparator(mut self, compare: ValidatorAccountComparator) -> Self {
        self.compare = compare;
        self
    }

    /// Skip grossing up for the withdrawal fee
    pub fn with_skip_fee(mut self, skip_fee: bool) -> Self {
        self.skip_fee = skip_fee;
        self
    }
}

/// Stake accounts of every active validator with lamports above what they
/// must keep, or all of their lamports when `removal` is set
fn candidate_accounts(
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    validator_list: &ValidatorList,
    program_id: &Pubkey,
    min_balance: u64,
    removal: bool,
) -> Vec<ValidatorAccount> {
    let available = |lamports: u64| {
        if removal {
            lamports
        } else {
            lamports.saturating_sub(min_balance)
        }
    };

    let mut accounts = vec![];
    for validator in validator_list.validators.iter().filter(|v| v.is_active()) {
        let vote_address = validator.vote_account_address;

        let lamports = available(validator.active_stake_lamports);
        if lamports > 0 {
            let kind = if stake_pool.preferred_withdraw_validator_vote_address == Some(vote_address)
            {
                ValidatorAccountKind::Preferred
            } else {
                ValidatorAccountKind::Active
            };
            accounts.push(ValidatorAccount {
                kind,
                vote_address,
                stake_address: validator_stake_address(
                    program_id,
                    &vote_address,
                    stake_pool_address,
                    NonZeroU32::new(validator.validator_seed_suffix),
                ),
                lamports,
            });
        }

        let lamports = available(validator.transient_stake_lamports);
        if lamports > 0 {
            accounts.push(ValidatorAccount {
                kind: ValidatorAccountKind::Transient,
                vote_address,
                stake_address: transient_stake_address(
                    program_id,
                    &vote_address,
                    stake_pool_address,
                    validator.transient_seed_suffix,
                ),
                lamports,
            });
        }
    }
    accounts
}

/// Plan a withdrawal of `amount` pool tokens out of the pool's validator
/// stake accounts.
///
/// While some active validator holds more than its minimum balance, every
/// account keeps that minimum and may be drawn partially. Otherwise the pool
/// is removing validators, so accounts are only taken whole.
///
/// Accounts are drawn from the preferred validator first, then other active
/// stake, then transient stake, each group in the order given by
/// `config.compare`.
pub fn prepare_withdraw_accounts(
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    amount: u64,
    validator_list: Option<&ValidatorList>,
    config: &WithdrawConfig,
    mode: WithdrawMode,
) -> Result<WithdrawPlan, WithdrawError> {
    let validator_list = match validator_list {
        Some(list) if !list.validators.is_empty() => list,
        _ => return Err(WithdrawError::NoStakeAvailable),
    };

    let min_balance = config
        .minimum_balance
        .min_balance()
        .ok_or(WithdrawError::CalculationFailure)?;
    let lamports_per_pool_token = if stake_pool.pool_token_supply == 0 {
        0
    } else {
        stake_pool
            .get_lamports_per_pool_token()
            .ok_or(WithdrawError::CalculationFailure)?
    };
    let minimum_lamports_with_tolerance = min_balance as u128 + lamports_per_pool_token as u128;

    let has_withdrawable_stake = validator_list
        .validators
        .iter()
        .filter(|v| v.is_active())
        .any(|v| {
            v.active_stake_lamports as u128 > minimum_lamports_with_tolerance
                || v.transient_stake_lamports as u128 > minimum_lamports_with_tolerance
        });
    let removal = !has_withdrawable_stake;
    debug!(
        "Withdrawing {} pool tokens, min balance {}, validator removal: {}",
        amount, min_balance, removal
    );

    let mut accounts = candidate_accounts(
        stake_pool,
        stake_pool_address,
        validator_list,
        &config.program_id,
        min_balance,
        removal,
    );
    accounts.sort_by(config.compare);

    let inverse_fee = stake_pool.stake_withdrawal_fee.inverse();
    let mut withdraw_accounts = vec![];
    let mut remaining_amount = amount;

    'passes: for kind in ValidatorAccountKind::DRAW_ORDER {
        for account in accounts.iter().filter(|a| a.kind == kind) {
            let mut available = stake_pool
                .pool_tokens_for_lamports(account.lamports)
                .ok_or(WithdrawError::CalculationFailure)?;
            if !config.skip_fee {
                available = inverse_fee
                    .apply_inverse(available)
                    .ok_or(WithdrawError::CalculationFailure)?;
            }
            trace!(
                "{:?} stake account {} offers {} pool tokens",
                account.kind,
                account.stake_address,
                available
            );

            // whole accounts only, during validator removal
            if removal && (remaining_amount as u128) < available {
                continue;
            }

            // bounded by remaining_amount, so it fits
            let pool_amount = available.min(remaining_amount as u128) as u64;
            if pool_amount == 0 {
                continue;
            }

            withdraw_accounts.push(WithdrawAccount {
                stake_address: account.stake_address,
                vote_address: Some(account.vote_address),
                pool_amount,
            });
            remaining_amount -= pool_amount;

            if remaining_amount == 0 {
                break 'passes;
            }
        }
    }

    let delayed_amount = amount - remaining_amount;
    debug!(
        "Withdrawal covered by {} stake accounts, {} pool tokens uncovered",
        withdraw_accounts.len(),
        remaining_amount
    );

    match mode {
        WithdrawMode::AllowPartial => Ok(WithdrawPlan::Partial {
            withdraw_accounts,
            delayed_amount,
            remaining_amount,
        }),
        WithdrawMode::Complete if remaining_amount > 0 => Err(WithdrawError::InsufficientFunds {
            requested: amount,
            available: delayed_amount,
        }),
        WithdrawMode::Complete => Ok(WithdrawPlan::Complete(withdraw_accounts)),
    }
}

/// Same as [`prepare_withdraw_accounts`], decoding the validator list account
/// first.
///
/// `validator_list_data` is `None` when the account does not exist.
pub fn prepare_withdraw_accounts_from_bytes(
    stake_pool: &StakePool,
    stake_pool_address: &Pubkey,
    amount: u64,
    validator_list_data: Option<&[u8]>,
    config: &WithdrawConfig,
    mode: WithdrawMode,
) -> Result<WithdrawPlan, WithdrawError> {
    let data = validator_list_data.ok_or(WithdrawError::NoStakeAvailable)?;
    let validator_list = decode_validator_list(data)?;
    prepare_withdraw_accounts(
        stake_pool,
        stake_pool_address,
        amount,
        Some(&validator_list),
        config,
        mode,
    )
}
