#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod cache;
pub mod config;
pub mod flash_loan;
pub mod logic;
pub mod oracle;
pub mod pool;
pub mod storage;
pub mod validation;
pub mod views;

use cache::Cache;
use common_constants::{DEFAULT_MAX_PRICE_AGE_SECONDS, PROTOCOL_VERSION};
pub use common_errors::*;
pub use common_structs::*;

/// Multi-asset lending ledger.
///
/// Suppliers deposit into per-asset pools and earn the supply index; borrowers draw against the
/// value of their collateral and owe the borrow index. Every mutating endpoint accrues all
/// reserves to the current block before touching balances.
#[multiversx_sc::contract]
pub trait Lending:
    storage::Storage
    + oracle::OracleModule
    + pool::PoolModule
    + validation::ValidationModule
    + logic::LogicModule
    + flash_loan::FlashLoanModule
    + config::ConfigModule
    + views::ViewsModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::pause::PauseModule
{
    #[init]
    fn init(&self) {
        self.version().set(PROTOCOL_VERSION);
        self.max_price_age().set(DEFAULT_MAX_PRICE_AGE_SECONDS);
    }

    #[upgrade]
    fn upgrade(&self) {}

    /// Supplies the attached payment to reserve `asset_id`.
    #[payable]
    #[endpoint(deposit)]
    fn deposit(&self, asset_id: u16) {
        self.require_active();
        let (coin_type, amount) = self.call_value().egld_or_single_fungible_esdt();
        let caller = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let reserve = self.get_reserve(asset_id);
        let normalized = self.normal_amount(reserve.pool_id, &amount);

        self.execute_deposit(&mut cache, asset_id, &coin_type, &caller, &normalized);
        self.deposit_balance(reserve.pool_id, &amount);
    }

    /// Withdraws up to `amount` (native units) of the caller's supply. Returns the amount sent.
    #[endpoint(withdraw)]
    fn withdraw(&self, asset_id: u16, amount: BigUint) -> BigUint {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let reserve = self.get_reserve(asset_id);
        let normalized = self.normal_amount(reserve.pool_id, &amount);

        let withdrawn = self.execute_withdraw(&mut cache, asset_id, &caller, &normalized);
        let native_amount = self.unnormal_amount(reserve.pool_id, &withdrawn);

        self.withdraw_balance(reserve.pool_id, &native_amount);
        self.send_asset(reserve.pool_id, &caller, &native_amount);

        native_amount
    }

    /// Borrows `amount` (native units) of `asset_id` against the caller's collateral.
    #[endpoint(borrow)]
    fn borrow(&self, asset_id: u16, amount: BigUint) {
        self.require_active();
        let caller = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let reserve = self.get_reserve(asset_id);
        let normalized = self.normal_amount(reserve.pool_id, &amount);

        self.execute_borrow(&mut cache, asset_id, &caller, &normalized);

        let native_amount = self.unnormal_amount(reserve.pool_id, &normalized);
        self.withdraw_balance(reserve.pool_id, &native_amount);
        self.send_asset(reserve.pool_id, &caller, &native_amount);
    }

    /// Repays the caller's debt with the attached payment; any excess is returned.
    #[payable]
    #[endpoint(repay)]
    fn repay(&self, asset_id: u16) {
        self.require_active();
        let (coin_type, amount) = self.call_value().egld_or_single_fungible_esdt();
        let caller = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let reserve = self.get_reserve(asset_id);
        let normalized = self.normal_amount(reserve.pool_id, &amount);

        let excess = self.execute_repay(&mut cache, asset_id, &coin_type, &caller, &normalized);
        let repaid = self.collected_amount(reserve.pool_id, &(normalized - excess), &amount);

        self.deposit_balance(reserve.pool_id, &repaid);
        self.send_asset(reserve.pool_id, &caller, &(amount - repaid));
    }

    /// Repays part of `user`'s `debt_asset` loan with the attached payment and receives
    /// `collateral_asset` at a discount. Unused payment is returned.
    #[payable]
    #[endpoint(liquidate)]
    fn liquidate(&self, debt_asset: u16, collateral_asset: u16, user: ManagedAddress) {
        self.require_active();
        let (coin_type, amount) = self.call_value().egld_or_single_fungible_esdt();
        let liquidator = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let debt_pool = self.get_reserve(debt_asset).pool_id;
        let collateral_pool = self.get_reserve(collateral_asset).pool_id;
        let normalized = self.normal_amount(debt_pool, &amount);

        let result = self.execute_liquidate(
            &mut cache,
            debt_asset,
            collateral_asset,
            &coin_type,
            &user,
            &liquidator,
            &normalized,
        );

        let repaid = self.collected_amount(debt_pool, &result.debt_repaid, &amount);
        self.deposit_balance(debt_pool, &repaid);
        self.send_asset(debt_pool, &liquidator, &(amount - repaid));

        let seized = self.unnormal_amount(collateral_pool, &result.liquidator_collateral);
        self.withdraw_balance(collateral_pool, &seized);
        self.send_asset(collateral_pool, &liquidator, &seized);
    }

    /// Lends `amount` of `coin_type` to `contract_address` for the duration of a synchronous
    /// call to `endpoint`. The callee must send back principal plus fees before returning;
    /// any overpayment goes to the caller.
    #[endpoint(flashLoan)]
    fn flash_loan(
        &self,
        coin_type: EgldOrEsdtTokenIdentifier,
        amount: BigUint,
        contract_address: ManagedAddress,
        endpoint: ManagedBuffer,
        arguments: MultiValueEncoded<ManagedBuffer>,
    ) {
        self.require_active();
        self.validate_flash_loan_receiver(&contract_address);
        let caller = self.blockchain().get_caller();
        let mut cache = Cache::new(self);

        let receipt = self.loan(&mut cache, &coin_type, &amount, &caller);

        self.flash_loan_ongoing().set(true);
        let back_transfers = self
            .tx()
            .to(&contract_address)
            .raw_call(endpoint)
            .arguments_raw(arguments.to_arg_buffer())
            .egld_or_single_esdt(&coin_type, 0, &amount)
            .returns(ReturnsBackTransfers)
            .sync_call();
        self.flash_loan_ongoing().set(false);

        let repayment = self.flash_loan_repayment(&coin_type, &back_transfers);
        let pool_id = receipt.pool_id;
        let excess = self.repay_flash_loan(receipt, &repayment);

        self.send_asset(pool_id, &caller, &excess);
    }

    /// Accrues every reserve to the current block.
    #[endpoint(updateState)]
    fn update_state_endpoint(&self) {
        self.when_not_paused();
        self.version_verification();
        self.update_state_of_all(self.blockchain().get_block_timestamp());
    }
}
