use crate::constants::*;

use lending::{
    config::ConfigModule, oracle::OracleModule, storage::Storage, views::ViewsModule, Lending,
    ReserveData,
};
use multiversx_sc::types::{
    BigUint, EgldOrEsdtTokenIdentifier, ManagedBuffer, MultiValueEncoded, TestAddress,
    TestTokenIdentifier,
};
use multiversx_sc_scenario::{
    imports::ExpectMessage, num_bigint, DebugApi, ScenarioTxWhitebox, ScenarioWorld,
};

pub fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();

    blockchain.register_contract(LENDING_PATH, lending::ContractBuilder);
    blockchain.register_contract(FLASH_MOCK_PATH, flash_mock::ContractBuilder);

    blockchain
}

/// `amount` whole tokens in native units.
pub fn tokens(amount: u128, decimals: u64) -> u128 {
    amount * 10u128.pow(decimals as u32)
}

pub fn to_num(value: &BigUint<DebugApi>) -> num_bigint::BigUint {
    num_bigint::BigUint::from_bytes_be(value.to_bytes_be().as_slice())
}

pub fn error_text(error: &[u8]) -> &str {
    core::str::from_utf8(error).unwrap()
}

pub struct LendingTestState {
    pub world: ScenarioWorld,
    pub timestamp: u64,
}

impl LendingTestState {
    /// Deploys the ledger with a WEGLD reserve (id 0) and a USDC reserve (id 1), both priced
    /// at 1 USD, plus a flash loan receiver.
    pub fn new() -> Self {
        let mut world = world();
        world.current_block().block_timestamp(START_TIMESTAMP);

        world.account(OWNER_ADDRESS).nonce(1);
        world.account(FEEDER_ADDRESS).nonce(1);
        for user in [SUPPLIER_ADDRESS, BORROWER_ADDRESS, LIQUIDATOR_ADDRESS] {
            setup_account(&mut world, user);
        }

        world
            .tx()
            .from(OWNER_ADDRESS)
            .raw_deploy()
            .code(LENDING_PATH)
            .new_address(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, |sc| {
                sc.init();
            });

        world
            .tx()
            .from(OWNER_ADDRESS)
            .raw_deploy()
            .code(FLASH_MOCK_PATH)
            .new_address(FLASH_MOCK_ADDRESS)
            .whitebox(flash_mock::contract_obj, |sc| {
                use flash_mock::FlashMock;
                sc.init();
            });
        world.set_esdt_balance(
            FLASH_MOCK_ADDRESS,
            USDC_TOKEN.as_bytes(),
            BigUint::from(tokens(1_000, USDC_DECIMALS)),
        );

        let mut state = Self {
            world,
            timestamp: START_TIMESTAMP,
        };

        state.add_reserve(EGLD_TOKEN, EGLD_ORACLE_ID, EGLD_DECIMALS);
        state.add_reserve(USDC_TOKEN, USDC_ORACLE_ID, USDC_DECIMALS);
        state.refresh_prices();

        state
    }

    pub fn add_reserve(&mut self, token: TestTokenIdentifier, oracle_id: u16, decimals: u64) {
        self.owner(|sc| {
            sc.add_reserve(
                EgldOrEsdtTokenIdentifier::esdt(token.to_token_identifier()),
                oracle_id,
                decimals as usize,
                false,
                BigUint::from(SUPPLY_CAP),
                BigUint::from(RAY),
                BigUint::from(LTV),
                BigUint::from(TREASURY_FACTOR),
                BigUint::from(R_BASE),
                BigUint::from(R_SLOPE1),
                BigUint::from(R_SLOPE2),
                BigUint::from(RESERVE_FACTOR),
                BigUint::from(U_OPTIMAL),
                BigUint::from(LIQ_RATIO),
                BigUint::from(LIQ_BONUS),
                BigUint::from(LIQ_THRESHOLD),
            );
        });
    }

    // --- Plumbing ---

    pub fn owner<F>(&mut self, f: F)
    where
        F: FnOnce(lending::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, f);
    }

    pub fn owner_error<F>(&mut self, error: &[u8], f: F)
    where
        F: FnOnce(lending::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(LENDING_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, f);
    }

    pub fn call_as<F>(&mut self, from: TestAddress, f: F)
    where
        F: FnOnce(lending::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, f);
    }

    pub fn call_as_error<F>(&mut self, from: TestAddress, error: &[u8], f: F)
    where
        F: FnOnce(lending::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, f);
    }

    pub fn query<F>(&mut self, f: F)
    where
        F: FnOnce(lending::ContractObj<DebugApi>),
    {
        self.world
            .query()
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, f);
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
        self.world.current_block().block_timestamp(timestamp);
    }

    /// Moves time forward and republishes prices so they stay fresh.
    pub fn advance_time(&mut self, seconds: u64) {
        self.set_timestamp(self.timestamp + seconds);
        self.refresh_prices();
    }

    pub fn set_price(&mut self, oracle_id: u16, price_wad: u128) {
        self.owner(|sc| {
            sc.set_price(oracle_id, BigUint::from(price_wad));
        });
    }

    pub fn refresh_prices(&mut self) {
        self.set_price(EGLD_ORACLE_ID, tokens(1, 18));
        self.set_price(USDC_ORACLE_ID, tokens(1, 18));
    }

    // --- User flows ---

    pub fn deposit(
        &mut self,
        from: TestAddress,
        asset_id: u16,
        token: TestTokenIdentifier,
        amount: u128,
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .whitebox(lending::contract_obj, |sc| {
                sc.deposit(asset_id);
            });
    }

    pub fn deposit_error(
        &mut self,
        from: TestAddress,
        asset_id: u16,
        token: TestTokenIdentifier,
        amount: u128,
        error: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.deposit(asset_id);
            });
    }

    pub fn withdraw(&mut self, from: TestAddress, asset_id: u16, amount: u128) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, |sc| {
                sc.withdraw(asset_id, BigUint::from(amount));
            });
    }

    pub fn withdraw_error(&mut self, from: TestAddress, asset_id: u16, amount: u128, error: &[u8]) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.withdraw(asset_id, BigUint::from(amount));
            });
    }

    pub fn borrow(&mut self, from: TestAddress, asset_id: u16, amount: u128) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, |sc| {
                sc.borrow(asset_id, BigUint::from(amount));
            });
    }

    pub fn borrow_error(&mut self, from: TestAddress, asset_id: u16, amount: u128, error: &[u8]) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.borrow(asset_id, BigUint::from(amount));
            });
    }

    pub fn repay(
        &mut self,
        from: TestAddress,
        asset_id: u16,
        token: TestTokenIdentifier,
        amount: u128,
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .whitebox(lending::contract_obj, |sc| {
                sc.repay(asset_id);
            });
    }

    pub fn repay_error(
        &mut self,
        from: TestAddress,
        asset_id: u16,
        token: TestTokenIdentifier,
        amount: u128,
        error: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.repay(asset_id);
            });
    }

    pub fn liquidate(
        &mut self,
        from: TestAddress,
        debt_asset: u16,
        collateral_asset: u16,
        user: TestAddress,
        token: TestTokenIdentifier,
        amount: u128,
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .whitebox(lending::contract_obj, |sc| {
                sc.liquidate(debt_asset, collateral_asset, user.to_managed_address());
            });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn liquidate_error(
        &mut self,
        from: TestAddress,
        debt_asset: u16,
        collateral_asset: u16,
        user: TestAddress,
        token: TestTokenIdentifier,
        amount: u128,
        error: &[u8],
    ) {
        self.world
            .tx()
            .from(from)
            .to(LENDING_ADDRESS)
            .single_esdt(&token.to_token_identifier(), 0, &BigUint::from(amount))
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.liquidate(debt_asset, collateral_asset, user.to_managed_address());
            });
    }

    pub fn flash_loan(
        &mut self,
        token: TestTokenIdentifier,
        amount: u128,
        endpoint: &str,
        fee_bps: Option<u64>,
    ) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, |sc| {
                sc.flash_loan(
                    EgldOrEsdtTokenIdentifier::esdt(token.to_token_identifier()),
                    BigUint::from(amount),
                    FLASH_MOCK_ADDRESS.to_managed_address(),
                    ManagedBuffer::from(endpoint),
                    flash_arguments(fee_bps),
                );
            });
    }

    pub fn flash_loan_error(
        &mut self,
        token: TestTokenIdentifier,
        amount: u128,
        endpoint: &str,
        fee_bps: Option<u64>,
        error: &[u8],
    ) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(LENDING_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(lending::contract_obj, |sc| {
                sc.flash_loan(
                    EgldOrEsdtTokenIdentifier::esdt(token.to_token_identifier()),
                    BigUint::from(amount),
                    FLASH_MOCK_ADDRESS.to_managed_address(),
                    ManagedBuffer::from(endpoint),
                    flash_arguments(fee_bps),
                );
            });
    }

    pub fn update_state(&mut self) {
        self.world
            .tx()
            .from(OWNER_ADDRESS)
            .to(LENDING_ADDRESS)
            .whitebox(lending::contract_obj, |sc| {
                sc.update_state_endpoint();
            });
    }

    // --- Reads ---

    pub fn reserve<F>(&mut self, asset_id: u16, f: F)
    where
        F: FnOnce(ReserveData<DebugApi>),
    {
        self.query(|sc| f(sc.get_reserve_view(asset_id)));
    }

    /// Raw `(supply_index, borrow_index, treasury_balance)` of a reserve.
    pub fn indexes(
        &mut self,
        asset_id: u16,
    ) -> (num_bigint::BigUint, num_bigint::BigUint, num_bigint::BigUint) {
        let mut result = Default::default();
        self.reserve(asset_id, |reserve| {
            result = (
                to_num(reserve.current_supply_index.into_raw_units()),
                to_num(reserve.current_borrow_index.into_raw_units()),
                to_num(reserve.treasury_balance.into_raw_units()),
            );
        });
        result
    }

    /// Real `(supply, borrow)` of `user`, raw 9-decimal units.
    pub fn user_balance(
        &mut self,
        asset_id: u16,
        user: TestAddress,
    ) -> (num_bigint::BigUint, num_bigint::BigUint) {
        let mut result = Default::default();
        self.query(|sc| {
            let (supply, borrow) = sc
                .get_user_balance_view(asset_id, user.to_managed_address())
                .into_tuple();
            result = (to_num(supply.into_raw_units()), to_num(borrow.into_raw_units()));
        });
        result
    }

    pub fn health_factor(&mut self, user: TestAddress) -> num_bigint::BigUint {
        let mut result = Default::default();
        self.query(|sc| {
            result = to_num(sc.get_health_factor(user.to_managed_address()).into_raw_units());
        });
        result
    }

    pub fn has_collateral(&mut self, user: TestAddress, asset_id: u16) -> bool {
        let mut result = false;
        self.query(|sc| {
            result = sc
                .user_collaterals(&user.to_managed_address())
                .contains(&asset_id);
        });
        result
    }

    pub fn has_loan(&mut self, user: TestAddress, asset_id: u16) -> bool {
        let mut result = false;
        self.query(|sc| {
            result = sc.user_loans(&user.to_managed_address()).contains(&asset_id);
        });
        result
    }

    pub fn check_esdt_balance(&mut self, user: TestAddress, token: TestTokenIdentifier, amount: u128) {
        self.world
            .check_account(user)
            .esdt_balance(token, BigUint::from(amount));
    }
}

pub fn setup_account(world: &mut ScenarioWorld, user: TestAddress) {
    world
        .account(user)
        .nonce(1)
        .esdt_balance(EGLD_TOKEN, BigUint::from(tokens(1_000_000, EGLD_DECIMALS)))
        .esdt_balance(USDC_TOKEN, BigUint::from(tokens(1_000_000, USDC_DECIMALS)))
        .esdt_balance(UNKNOWN_TOKEN, BigUint::from(tokens(1_000_000, 18)));
}

fn flash_arguments(fee_bps: Option<u64>) -> MultiValueEncoded<DebugApi, ManagedBuffer<DebugApi>> {
    let mut arguments = MultiValueEncoded::new();
    if let Some(fee) = fee_bps {
        arguments.push(ManagedBuffer::new_from_bytes(&fee.to_be_bytes()));
    }
    arguments
}
