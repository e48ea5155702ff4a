#![allow(dead_code)]

use {
    solana_program::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey},
    spl_stake_pool_sdk::{
        AccountType, MinimumBalanceInputs, StakePool, StakeStatus, ValidatorList,
        ValidatorListHeader, ValidatorStakeInfo, WithdrawConfig, MINIMUM_ACTIVE_STAKE,
    },
};

pub const STAKE_RENT: u64 = 2_282_880;

pub const MIN_BALANCE: u64 = STAKE_RENT + MINIMUM_ACTIVE_STAKE;

pub fn config() -> WithdrawConfig {
    WithdrawConfig::default().with_minimum_balance(MinimumBalanceInputs {
        rent_exemption_minimum: STAKE_RENT,
        stake_minimum_delegation: LAMPORTS_PER_SOL / 1_000,
    })
}

pub fn stake_pool(total_lamports: u64, pool_token_supply: u64) -> StakePool {
    StakePool {
        account_type: AccountType::StakePool,
        manager: Pubkey::new_unique(),
        staker: Pubkey::new_unique(),
        validator_list: Pubkey::new_unique(),
        reserve_stake: Pubkey::new_unique(),
        pool_mint: Pubkey::new_unique(),
        total_lamports,
        pool_token_supply,
        ..StakePool::default()
    }
}

pub fn validator(active_stake_lamports: u64, transient_stake_lamports: u64) -> ValidatorStakeInfo {
    ValidatorStakeInfo {
        active_stake_lamports,
        transient_stake_lamports,
        last_update_epoch: 10,
        status: StakeStatus::Active,
        vote_account_address: Pubkey::new_unique(),
        ..ValidatorStakeInfo::default()
    }
}

pub fn validator_list(validators: Vec<ValidatorStakeInfo>) -> ValidatorList {
    ValidatorList {
        header: ValidatorListHeader {
            account_type: AccountType::ValidatorList,
            max_validators: 100,
        },
        validators,
    }
}
