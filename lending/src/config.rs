multiversx_sc::imports!();

use common_constants::{NORMAL_DECIMALS, PROTOCOL_VERSION};
use common_errors::*;
use common_structs::{BorrowRateFactors, FlashLoanConfig, LiquidationFactors, ReserveData};

/// Governance surface of the ledger.
///
/// Every endpoint is owner-only. Ratios (`ltv`, factors, caps expressed as shares) are passed
/// as raw RAY units, the supply cap as raw 9-decimal units. Changes that alter the rate curve
/// accrue all reserves first so past interest is booked under the old parameters.
#[multiversx_sc::module]
pub trait ConfigModule:
    crate::storage::Storage
    + crate::oracle::OracleModule
    + crate::pool::PoolModule
    + crate::validation::ValidationModule
    + crate::logic::LogicModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::pause::PauseModule
{
    /// Registers a reserve and its pool under the next free asset id.
    ///
    /// # Arguments
    /// - `coin_type`: token held by the pool.
    /// - `oracle_id`: price feed used to value the asset.
    /// - `decimals`: native decimals of the token, at most 18.
    /// - `supply_cap`: absolute ceiling on real supply, 9 decimals.
    /// - `borrow_cap`: ceiling on `real_borrow / real_supply`, RAY.
    /// - `ltv`, `treasury_factor`: RAY.
    /// - rate curve and liquidation factors: RAY, annual for the rates.
    ///
    /// # Errors
    /// - `ERROR_DUPLICATE_CONFIG`: the coin already has a reserve.
    /// - `ERROR_INVALID_LTV`, `ERROR_INVALID_RATIO`, `ERROR_INVALID_OPTIMAL_UTILIZATION`,
    ///   `ERROR_INVALID_DECIMALS`: inconsistent parameters.
    #[only_owner]
    #[endpoint(addReserve)]
    fn add_reserve(
        &self,
        coin_type: EgldOrEsdtTokenIdentifier,
        oracle_id: u16,
        decimals: usize,
        is_isolated: bool,
        supply_cap: BigUint,
        borrow_cap: BigUint,
        ltv: BigUint,
        treasury_factor: BigUint,
        base_rate: BigUint,
        multiplier: BigUint,
        jump_rate_multiplier: BigUint,
        reserve_factor: BigUint,
        optimal_utilization: BigUint,
        liquidation_ratio: BigUint,
        liquidation_bonus: BigUint,
        liquidation_threshold: BigUint,
    ) -> u16 {
        require!(coin_type.is_valid(), ERROR_INVALID_COIN_TYPE);
        require!(
            !self.asset_ids().contains_key(&coin_type),
            ERROR_DUPLICATE_CONFIG
        );
        require!(decimals <= 18, ERROR_INVALID_DECIMALS);

        let borrow_rate_factors = BorrowRateFactors {
            base_rate: self.to_decimal_ray(base_rate),
            multiplier: self.to_decimal_ray(multiplier),
            jump_rate_multiplier: self.to_decimal_ray(jump_rate_multiplier),
            reserve_factor: self.to_decimal_ray(reserve_factor),
            optimal_utilization: self.to_decimal_ray(optimal_utilization),
        };
        let liquidation_factors = LiquidationFactors {
            ratio: self.to_decimal_ray(liquidation_ratio),
            bonus: self.to_decimal_ray(liquidation_bonus),
            threshold: self.to_decimal_ray(liquidation_threshold),
        };
        let ltv = self.to_decimal_ray(ltv);
        let treasury_factor = self.to_decimal_ray(treasury_factor);
        let borrow_cap_ceiling = self.to_decimal_ray(borrow_cap);

        self.validate_borrow_rate_factors(&borrow_rate_factors);
        self.validate_liquidation_factors(&ltv, &liquidation_factors);
        self.require_ratio(&treasury_factor);
        self.require_ratio(&borrow_cap_ceiling);

        let asset_id = self.reserves_count().get();
        let reserve = ReserveData {
            asset_id,
            coin_type: coin_type.clone(),
            oracle_id,
            pool_id: asset_id,
            decimals,
            is_isolated,
            supply_cap_ceiling: self.to_decimal(supply_cap, NORMAL_DECIMALS),
            borrow_cap_ceiling,
            ltv,
            treasury_factor,
            borrow_rate_factors,
            liquidation_factors,
            current_supply_rate: self.ray_zero(),
            current_borrow_rate: self.ray_zero(),
            current_supply_index: self.ray(),
            current_borrow_index: self.ray(),
            last_update_timestamp: self.blockchain().get_block_timestamp(),
            total_supply: self.ray_zero(),
            total_borrow: self.ray_zero(),
            treasury_balance: self.ray_zero(),
        };

        self.reserve(asset_id).set(&reserve);
        self.asset_ids().insert(coin_type.clone(), asset_id);
        self.reserves_count().set(asset_id + 1);
        self.create_pool(asset_id, &coin_type, decimals);

        self.reserve_created_event(asset_id, &coin_type, oracle_id, &reserve);

        asset_id
    }

    #[only_owner]
    #[endpoint(setSupplyCap)]
    fn set_supply_cap(&self, asset_id: u16, supply_cap: BigUint) {
        let cap = self.to_decimal(supply_cap, NORMAL_DECIMALS);
        self.update_reserve_config(asset_id, |reserve| reserve.supply_cap_ceiling = cap);
    }

    #[only_owner]
    #[endpoint(setBorrowCap)]
    fn set_borrow_cap(&self, asset_id: u16, borrow_cap: BigUint) {
        let cap = self.to_decimal_ray(borrow_cap);
        self.require_ratio(&cap);
        self.update_reserve_config(asset_id, |reserve| reserve.borrow_cap_ceiling = cap);
    }

    #[only_owner]
    #[endpoint(setLtv)]
    fn set_ltv(&self, asset_id: u16, ltv: BigUint) {
        let ltv = self.to_decimal_ray(ltv);
        let factors = self.get_liquidation_factors(asset_id);
        self.validate_liquidation_factors(&ltv, &factors);
        self.update_reserve_config(asset_id, |reserve| reserve.ltv = ltv);
    }

    #[only_owner]
    #[endpoint(setTreasuryFactor)]
    fn set_treasury_factor(&self, asset_id: u16, treasury_factor: BigUint) {
        let factor = self.to_decimal_ray(treasury_factor);
        self.require_ratio(&factor);
        self.update_reserve_config(asset_id, |reserve| reserve.treasury_factor = factor);
    }

    #[only_owner]
    #[endpoint(setReserveFactor)]
    fn set_reserve_factor(&self, asset_id: u16, reserve_factor: BigUint) {
        let factor = self.to_decimal_ray(reserve_factor);
        self.require_ratio(&factor);

        self.update_state_of_all(self.blockchain().get_block_timestamp());
        self.update_reserve_config(asset_id, |reserve| {
            reserve.borrow_rate_factors.reserve_factor = factor
        });
        self.refresh_interest_rate(asset_id);
    }

    #[only_owner]
    #[endpoint(setBorrowRateFactors)]
    fn set_borrow_rate_factors(
        &self,
        asset_id: u16,
        base_rate: BigUint,
        multiplier: BigUint,
        jump_rate_multiplier: BigUint,
        optimal_utilization: BigUint,
    ) {
        let current = self.get_borrow_rate_factors(asset_id);
        let factors = BorrowRateFactors {
            base_rate: self.to_decimal_ray(base_rate),
            multiplier: self.to_decimal_ray(multiplier),
            jump_rate_multiplier: self.to_decimal_ray(jump_rate_multiplier),
            reserve_factor: current.reserve_factor,
            optimal_utilization: self.to_decimal_ray(optimal_utilization),
        };
        self.validate_borrow_rate_factors(&factors);

        self.update_state_of_all(self.blockchain().get_block_timestamp());
        self.update_reserve_config(asset_id, |reserve| reserve.borrow_rate_factors = factors);
        self.refresh_interest_rate(asset_id);
    }

    #[only_owner]
    #[endpoint(setLiquidationFactors)]
    fn set_liquidation_factors(
        &self,
        asset_id: u16,
        ratio: BigUint,
        bonus: BigUint,
        threshold: BigUint,
    ) {
        let factors = LiquidationFactors {
            ratio: self.to_decimal_ray(ratio),
            bonus: self.to_decimal_ray(bonus),
            threshold: self.to_decimal_ray(threshold),
        };
        let reserve = self.get_reserve(asset_id);
        self.validate_liquidation_factors(&reserve.ltv, &factors);

        self.update_reserve_config(asset_id, |reserve| reserve.liquidation_factors = factors);
    }

    /// Stored and exposed through `getReserve`; no endpoint restricts isolated assets yet.
    #[only_owner]
    #[endpoint(setIsolated)]
    fn set_isolated(&self, asset_id: u16, is_isolated: bool) {
        self.update_reserve_config(asset_id, |reserve| reserve.is_isolated = is_isolated);
    }

    /// Enables flash loans of `asset_id`. Rates are over `FLASH_LOAN_FEE_MULTIPLE`,
    /// bounds in native units.
    #[only_owner]
    #[endpoint(addFlashLoanConfig)]
    fn add_flash_loan_config(
        &self,
        asset_id: u16,
        rate_to_supplier: u64,
        rate_to_treasury: u64,
        min: BigUint,
        max: BigUint,
    ) {
        let reserve = self.get_reserve(asset_id);
        require!(
            !self.flash_loan_assets().contains_key(&reserve.coin_type),
            ERROR_DUPLICATE_CONFIG
        );
        require!(min <= max, ERROR_INVALID_AMOUNT);

        let config = FlashLoanConfig {
            asset_id,
            coin_type: reserve.coin_type.clone(),
            pool_id: reserve.pool_id,
            rate_to_supplier,
            rate_to_treasury,
            min,
            max,
        };

        self.flash_loan_assets().insert(reserve.coin_type.clone(), asset_id);
        self.flash_loan_config(asset_id).set(&config);
        self.flash_loan_config_event(asset_id, &config);
    }

    #[only_owner]
    #[endpoint(setFlashLoanConfig)]
    fn set_flash_loan_config(
        &self,
        asset_id: u16,
        rate_to_supplier: u64,
        rate_to_treasury: u64,
        min: BigUint,
        max: BigUint,
    ) {
        let mapper = self.flash_loan_config(asset_id);
        require!(!mapper.is_empty(), ERROR_FLASH_LOAN_NOT_CONFIGURED);
        require!(min <= max, ERROR_INVALID_AMOUNT);

        let config = mapper.update(|config| {
            config.rate_to_supplier = rate_to_supplier;
            config.rate_to_treasury = rate_to_treasury;
            config.min = min;
            config.max = max;
            config.clone()
        });
        self.flash_loan_config_event(asset_id, &config);
    }

    #[only_owner]
    #[endpoint(addPriceFeeder)]
    fn add_price_feeder(&self, feeder: ManagedAddress) {
        self.price_feeders().insert(feeder);
    }

    #[only_owner]
    #[endpoint(removePriceFeeder)]
    fn remove_price_feeder(&self, feeder: ManagedAddress) {
        self.price_feeders().swap_remove(&feeder);
    }

    #[only_owner]
    #[endpoint(setMaxPriceAge)]
    fn set_max_price_age(&self, seconds: u64) {
        self.max_price_age().set(seconds);
    }

    /// Moves the stored schema version up to the one this code expects.
    #[only_owner]
    #[endpoint(migrate)]
    fn migrate(&self) {
        let old_version = self.version().get();
        require!(old_version < PROTOCOL_VERSION, ERROR_NOT_UPGRADED);

        self.version().set(PROTOCOL_VERSION);
        self.version_migrated_event(old_version, PROTOCOL_VERSION);
    }

    /// Withdraws up to `amount` (native units) of the interest-bearing treasury supply.
    /// Returns the amount sent.
    #[only_owner]
    #[endpoint(withdrawTreasury)]
    fn withdraw_treasury_supply(
        &self,
        asset_id: u16,
        amount: BigUint,
        recipient: ManagedAddress,
    ) -> BigUint {
        self.version_verification();
        self.update_state_of_all(self.blockchain().get_block_timestamp());

        let reserve = self.get_reserve(asset_id);
        let requested = self.normal_amount(reserve.pool_id, &amount);
        let available = self.scaled_to_original(
            &reserve.treasury_balance,
            &reserve.current_supply_index,
            NORMAL_DECIMALS,
        );
        let to_withdraw = self.get_min(requested, available);
        self.require_amount_greater_than_zero(&to_withdraw);
        self.require_reserve_liquidity(asset_id, &to_withdraw);

        let scaled = self.get_min(
            self.original_to_scaled(&to_withdraw, &reserve.current_supply_index),
            reserve.treasury_balance.clone(),
        );
        self.decrease_treasury_balance(asset_id, &scaled);
        self.refresh_interest_rate(asset_id);

        let native_amount = self.unnormal_amount(reserve.pool_id, &to_withdraw);
        self.withdraw_balance(reserve.pool_id, &native_amount);
        self.send_asset(reserve.pool_id, &recipient, &native_amount);
        self.treasury_withdraw_event(asset_id, &recipient, &native_amount);

        native_amount
    }

    /// Sends the whole fee bucket of `pool_id` (flash loan treasury fees) to `recipient`.
    #[only_owner]
    #[endpoint(claimPoolTreasury)]
    fn claim_pool_treasury(&self, pool_id: u16, recipient: ManagedAddress) -> BigUint {
        self.require_reserve_exists(pool_id);

        let amount = self.pool(pool_id).get().treasury_balance;
        self.withdraw_treasury(pool_id, &amount);
        self.send_asset(pool_id, &recipient, &amount);
        self.treasury_withdraw_event(pool_id, &recipient, &amount);

        amount
    }

    // --- Helpers ---

    fn update_reserve_config<F: FnOnce(&mut ReserveData<Self::Api>)>(&self, asset_id: u16, f: F) {
        self.require_reserve_exists(asset_id);
        let reserve = self.reserve(asset_id).update(|reserve| {
            f(reserve);
            reserve.clone()
        });
        self.reserve_config_updated_event(asset_id, &reserve);
    }

    fn require_ratio(&self, value: &ManagedDecimal<Self::Api, NumDecimals>) {
        require!(value <= &self.ray(), ERROR_INVALID_RATIO);
    }

    fn validate_borrow_rate_factors(&self, factors: &BorrowRateFactors<Self::Api>) {
        self.require_ratio(&factors.reserve_factor);
        require!(
            factors.optimal_utilization > self.ray_zero()
                && factors.optimal_utilization < self.ray(),
            ERROR_INVALID_OPTIMAL_UTILIZATION
        );
    }

    fn validate_liquidation_factors(
        &self,
        ltv: &ManagedDecimal<Self::Api, NumDecimals>,
        factors: &LiquidationFactors<Self::Api>,
    ) {
        self.require_ratio(&factors.ratio);
        self.require_ratio(&factors.bonus);
        self.require_ratio(&factors.threshold);
        require!(ltv < &factors.threshold, ERROR_INVALID_LTV);
    }
}
