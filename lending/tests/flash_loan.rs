use common_errors::*;
use lending::{config::ConfigModule, pool::PoolModule};
use multiversx_sc::types::BigUint;
use multiversx_sc_scenario::num_bigint;

pub mod constants;
pub mod setup;
use constants::*;
use setup::*;

fn flash_market() -> LendingTestState {
    let mut state = LendingTestState::new();
    state.owner(|sc| {
        sc.add_flash_loan_config(
            USDC_ASSET_ID,
            FLASH_FEE_SUPPLIER,
            FLASH_FEE_TREASURY,
            BigUint::from(1u32),
            BigUint::from(tokens(1_000_000, USDC_DECIMALS)),
        );
    });
    state.deposit(SUPPLIER_ADDRESS, USDC_ASSET_ID, USDC_TOKEN, tokens(10_000, USDC_DECIMALS));
    state
}

#[test]
fn exact_repayment_settles_fees() {
    let mut state = flash_market();

    state.flash_loan(
        USDC_TOKEN,
        tokens(100, USDC_DECIMALS),
        "flash",
        Some(FLASH_FEE_BPS),
    );

    // 0.3 USDC supplier fee spread over 10_000 USDC of supply
    let (supply_index, _, _) = state.indexes(USDC_ASSET_ID);
    assert_eq!(
        supply_index,
        num_bigint::BigUint::from(RAY + 3 * RAY / 100_000)
    );

    state.query(|sc| {
        let pool = sc.pool(USDC_ASSET_ID).get();
        assert_eq!(pool.balance, BigUint::from(10_000_300_000u64));
        assert_eq!(pool.treasury_balance, BigUint::from(200_000u64));
    });

    state
        .world
        .check_account(FLASH_MOCK_ADDRESS)
        .esdt_balance(
            USDC_TOKEN,
            BigUint::from(tokens(1_000, USDC_DECIMALS) - 500_000),
        );
}

#[test]
fn overpayment_goes_back_to_caller() {
    let mut state = flash_market();

    state.flash_loan(USDC_TOKEN, tokens(100, USDC_DECIMALS), "flash", Some(100));

    state.check_esdt_balance(OWNER_ADDRESS, USDC_TOKEN, 500_000);
}

#[test]
fn short_repayment_fails() {
    let mut state = flash_market();

    state.flash_loan_error(
        USDC_TOKEN,
        tokens(100, USDC_DECIMALS),
        "flashRepayShort",
        Some(FLASH_FEE_BPS),
        ERROR_INVALID_FLASHLOAN_REPAYMENT,
    );
}

#[test]
fn missing_repayment_fails() {
    let mut state = flash_market();

    state.flash_loan_error(
        USDC_TOKEN,
        tokens(100, USDC_DECIMALS),
        "flashNoRepay",
        None,
        ERROR_INVALID_FLASHLOAN_REPAYMENT,
    );
}

#[test]
fn unconfigured_coin_fails() {
    let mut state = flash_market();
    state.deposit(SUPPLIER_ADDRESS, EGLD_ASSET_ID, EGLD_TOKEN, tokens(10, EGLD_DECIMALS));

    state.flash_loan_error(
        EGLD_TOKEN,
        tokens(1, EGLD_DECIMALS),
        "flash",
        Some(FLASH_FEE_BPS),
        ERROR_FLASH_LOAN_NOT_CONFIGURED,
    );
}

#[test]
fn amount_outside_bounds_fails() {
    let mut state = flash_market();

    state.flash_loan_error(
        USDC_TOKEN,
        tokens(1_000_001, USDC_DECIMALS),
        "flash",
        Some(FLASH_FEE_BPS),
        ERROR_FLASH_LOAN_AMOUNT_OUT_OF_BOUNDS,
    );
}

#[test]
fn duplicate_flash_config_fails() {
    let mut state = flash_market();

    state.owner_error(ERROR_DUPLICATE_CONFIG, |sc| {
        sc.add_flash_loan_config(
            USDC_ASSET_ID,
            FLASH_FEE_SUPPLIER,
            FLASH_FEE_TREASURY,
            BigUint::from(1u32),
            BigUint::from(2u32),
        );
    });
}

#[test]
fn owner_claims_pool_fees() {
    let mut state = flash_market();
    state.flash_loan(
        USDC_TOKEN,
        tokens(100, USDC_DECIMALS),
        "flash",
        Some(FLASH_FEE_BPS),
    );

    state.owner(|sc| {
        let claimed = sc.claim_pool_treasury(USDC_ASSET_ID, OWNER_ADDRESS.to_managed_address());
        assert_eq!(claimed, BigUint::from(200_000u64));
    });

    state.check_esdt_balance(OWNER_ADDRESS, USDC_TOKEN, 200_000);
    state.query(|sc| {
        assert_eq!(sc.pool(USDC_ASSET_ID).get().treasury_balance, BigUint::zero());
    });
}
