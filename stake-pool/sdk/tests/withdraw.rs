mod helpers;

use {
    assert_matches::assert_matches,
    helpers::*,
    proptest::prelude::*,
    solana_program::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey},
    spl_stake_pool_sdk::{
        encode_validator_list,
        pda::{transient_stake_address, validator_stake_address},
        prepare_withdraw_accounts, prepare_withdraw_accounts_from_bytes, Fee, StakeStatus,
        ValidatorAccount, WithdrawError, WithdrawMode, WithdrawPlan,
    },
    std::cmp::Ordering,
};

fn sol(amount: u64) -> u64 {
    amount * LAMPORTS_PER_SOL
}

#[test]
fn preferred_validator_is_drawn_first() {
    solana_logger::setup();
    let big = validator(sol(100), 0);
    let preferred = validator(sol(5), 0);
    let mut pool = stake_pool(sol(1_000), sol(1_000));
    pool.preferred_withdraw_validator_vote_address = Some(preferred.vote_account_address);
    let list = validator_list(vec![big, preferred]);
    let pool_address = Pubkey::new_unique();

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(10),
        Some(&list),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    let accounts = plan.withdraw_accounts();
    assert_eq!(accounts.len(), 2);
    assert_eq!(
        accounts[0].vote_address,
        Some(preferred.vote_account_address)
    );
    assert_eq!(accounts[0].pool_amount, sol(5) - MIN_BALANCE);
    assert_eq!(
        accounts[0].stake_address,
        validator_stake_address(
            &spl_stake_pool_sdk::id(),
            &preferred.vote_account_address,
            &pool_address,
            None
        )
    );
    assert_eq!(accounts[1].vote_address, Some(big.vote_account_address));
    assert_eq!(accounts[1].pool_amount, sol(10) - (sol(5) - MIN_BALANCE));
    assert_eq!(plan.total_pool_amount(), sol(10));
}

#[test]
fn transient_stake_is_drawn_last() {
    let mut seeded = validator(sol(3), sol(50));
    seeded.transient_seed_suffix = 9;
    seeded.validator_seed_suffix = 2;
    let pool = stake_pool(sol(1_000), sol(1_000));
    let pool_address = Pubkey::new_unique();
    let config = config().with_program_id(Pubkey::new_unique());

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(10),
        Some(&validator_list(vec![seeded])),
        &config,
        WithdrawMode::Complete,
    )
    .unwrap();
    let accounts = plan.withdraw_accounts();
    assert_eq!(accounts.len(), 2);
    assert_eq!(
        accounts[0].stake_address,
        validator_stake_address(
            &config.program_id,
            &seeded.vote_account_address,
            &pool_address,
            std::num::NonZeroU32::new(2)
        )
    );
    assert_eq!(accounts[0].pool_amount, sol(3) - MIN_BALANCE);
    assert_eq!(
        accounts[1].stake_address,
        transient_stake_address(
            &config.program_id,
            &seeded.vote_account_address,
            &pool_address,
            9
        )
    );
    assert_eq!(accounts[1].pool_amount, sol(10) - (sol(3) - MIN_BALANCE));
}

#[test]
fn comparator_replaces_default_order() {
    fn smallest_first(a: &ValidatorAccount, b: &ValidatorAccount) -> Ordering {
        a.lamports.cmp(&b.lamports)
    }

    let list = validator_list(vec![
        validator(sol(20), 0),
        validator(sol(10), 0),
        validator(sol(30), 0),
    ]);
    let pool = stake_pool(sol(1_000), sol(1_000));
    let pool_address = Pubkey::new_unique();

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(1),
        Some(&list),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    assert_eq!(
        plan.withdraw_accounts()[0].vote_address,
        Some(list.validators[2].vote_account_address)
    );

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(1),
        Some(&list),
        &config().with_comparator(smallest_first),
        WithdrawMode::Complete,
    )
    .unwrap();
    assert_eq!(
        plan.withdraw_accounts()[0].vote_address,
        Some(list.validators[1].vote_account_address)
    );
}

#[test]
fn validator_removal_takes_whole_accounts() {
    // nobody is above the minimum balance
    let list = validator_list(vec![
        validator(sol(1), 0),
        validator(sol(1) / 2, 0),
        validator(sol(8) / 10, 0),
    ]);
    let pool = stake_pool(sol(100), sol(100));
    let pool_address = Pubkey::new_unique();

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(15) / 10,
        Some(&list),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    let amounts: Vec<u64> = plan
        .withdraw_accounts()
        .iter()
        .map(|account| account.pool_amount)
        .collect();
    assert_eq!(amounts, vec![sol(1), sol(1) / 2]);

    // 0.3 SOL would be left after the first account, which no account fits
    assert_eq!(
        prepare_withdraw_accounts(
            &pool,
            &pool_address,
            sol(13) / 10,
            Some(&list),
            &config(),
            WithdrawMode::Complete,
        ),
        Err(WithdrawError::InsufficientFunds {
            requested: sol(13) / 10,
            available: sol(1),
        })
    );

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(13) / 10,
        Some(&list),
        &config(),
        WithdrawMode::AllowPartial,
    )
    .unwrap();
    assert_matches!(
        &plan,
        WithdrawPlan::Partial {
            withdraw_accounts,
            delayed_amount,
            remaining_amount,
        } if withdraw_accounts.len() == 1
            && *delayed_amount == sol(1)
            && *remaining_amount == sol(3) / 10
    );
}

#[test]
fn inactive_validators_never_enable_normal_mode() {
    let mut leaving = validator(sol(500), sol(500));
    leaving.status = StakeStatus::DeactivatingValidator;
    let small = validator(sol(1) / 2, 0);
    let list = validator_list(vec![leaving, small]);
    let pool = stake_pool(sol(1_000), sol(1_000));

    // removal mode, so the small validator is offered whole
    let plan = prepare_withdraw_accounts(
        &pool,
        &Pubkey::new_unique(),
        sol(1) / 2,
        Some(&list),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    assert_eq!(
        plan,
        WithdrawPlan::Complete(vec![spl_stake_pool_sdk::WithdrawAccount {
            stake_address: plan.withdraw_accounts()[0].stake_address,
            vote_address: Some(small.vote_account_address),
            pool_amount: sol(1) / 2,
        }])
    );
}

#[test]
fn fee_is_grossed_up_unless_skipped() {
    let mut pool = stake_pool(sol(1_000), sol(1_000));
    pool.stake_withdrawal_fee = Fee {
        denominator: 1_000,
        numerator: 3,
    };
    let list = validator_list(vec![validator(sol(1) + MIN_BALANCE, 0)]);
    let pool_address = Pubkey::new_unique();

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        u64::MAX,
        Some(&list),
        &config(),
        WithdrawMode::AllowPartial,
    )
    .unwrap();
    assert_eq!(plan.delayed_amount(), sol(1) * 1_000 / 997);

    let plan = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        u64::MAX,
        Some(&list),
        &config().with_skip_fee(true),
        WithdrawMode::AllowPartial,
    )
    .unwrap();
    assert_eq!(plan.delayed_amount(), sol(1));
}

#[test]
fn plans_from_account_bytes() {
    let list = validator_list(vec![validator(sol(10), 0), validator(sol(2), 0)]);
    let mut data = encode_validator_list(&list).unwrap();
    data.resize(data.len() + 73 * 5, 0);
    let pool = stake_pool(sol(1_000), sol(1_000));
    let pool_address = Pubkey::new_unique();

    let from_bytes = prepare_withdraw_accounts_from_bytes(
        &pool,
        &pool_address,
        sol(5),
        Some(&data),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    let decoded = prepare_withdraw_accounts(
        &pool,
        &pool_address,
        sol(5),
        Some(&list),
        &config(),
        WithdrawMode::Complete,
    )
    .unwrap();
    assert_eq!(from_bytes, decoded);

    assert_matches!(
        prepare_withdraw_accounts_from_bytes(
            &pool,
            &pool_address,
            sol(5),
            Some(&data[..20]),
            &config(),
            WithdrawMode::Complete,
        ),
        Err(WithdrawError::Layout(_))
    );
}

fn available_pool_tokens(
    pool: &spl_stake_pool_sdk::StakePool,
    balances: &[(u64, u64)],
) -> u64 {
    balances
        .iter()
        .flat_map(|(active, transient)| [*active, *transient])
        .map(|lamports| lamports.saturating_sub(MIN_BALANCE))
        .map(|lamports| pool.calc_pool_tokens_for_deposit(lamports).unwrap())
        .sum()
}

prop_compose! {
    fn pool_and_balances()(
        balances in prop::collection::vec((0..sol(50), 0..sol(5)), 0..8),
        total_lamports in sol(1_000)..sol(1_000_000),
        pool_token_supply in sol(1_000)..sol(1_000_000),
    ) -> (spl_stake_pool_sdk::StakePool, Vec<(u64, u64)>) {
        let mut balances = balances;
        // one validator above the minimum keeps the pool out of removal mode
        balances.insert(0, (sol(1_000), 0));
        (stake_pool(total_lamports, pool_token_supply), balances)
    }
}

proptest! {
    #[test]
    fn affordable_amounts_are_covered_exactly(
        (pool, balances) in pool_and_balances(),
        per_mille in 1u64..=1_000,
    ) {
        let list = validator_list(
            balances.iter().map(|(active, transient)| validator(*active, *transient)).collect(),
        );
        let available = available_pool_tokens(&pool, &balances);
        let amount = (available / 1_000 * per_mille).max(1);

        let plan = prepare_withdraw_accounts(
            &pool,
            &Pubkey::new_unique(),
            amount,
            Some(&list),
            &config(),
            WithdrawMode::Complete,
        ).unwrap();
        prop_assert_eq!(plan.total_pool_amount(), amount);
        prop_assert!(plan.withdraw_accounts().iter().all(|a| a.pool_amount > 0));
    }

    #[test]
    fn shortfall_is_reported(
        (pool, balances) in pool_and_balances(),
        extra in 1..sol(1),
    ) {
        let list = validator_list(
            balances.iter().map(|(active, transient)| validator(*active, *transient)).collect(),
        );
        let available = available_pool_tokens(&pool, &balances);
        let amount = available + extra;
        let pool_address = Pubkey::new_unique();

        let plan = prepare_withdraw_accounts(
            &pool,
            &pool_address,
            amount,
            Some(&list),
            &config(),
            WithdrawMode::AllowPartial,
        ).unwrap();
        prop_assert_eq!(plan.delayed_amount() + plan.remaining_amount(), amount);
        prop_assert_eq!(plan.remaining_amount(), extra);
        prop_assert_eq!(plan.total_pool_amount(), available);

        prop_assert_eq!(
            prepare_withdraw_accounts(
                &pool,
                &pool_address,
                amount,
                Some(&list),
                &config(),
                WithdrawMode::Complete,
            ),
            Err(WithdrawError::InsufficientFunds { requested: amount, available })
        );
    }
}
