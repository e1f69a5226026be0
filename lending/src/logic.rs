multiversx_sc::imports!();

use common_constants::{DUST_THRESHOLD, NORMAL_DECIMALS};
use common_errors::{
    ERROR_INSUFFICIENT_BALANCE, ERROR_INSUFFICIENT_COLLATERAL, ERROR_USER_HEALTHY,
    ERROR_USER_UNHEALTHY,
};

use crate::cache::Cache;

/// Outcome of a liquidation, all amounts on the 9-decimal scale.
pub struct LiquidationResult<M: ManagedTypeApi> {
    /// Collateral paid out to the liquidator, bonus included.
    pub liquidator_collateral: ManagedDecimal<M, NumDecimals>,
    /// Collateral re-credited to the treasury.
    pub treasury_collateral: ManagedDecimal<M, NumDecimals>,
    pub debt_repaid: ManagedDecimal<M, NumDecimals>,
    pub excess: ManagedDecimal<M, NumDecimals>,
    pub loan_closed: bool,
}

#[multiversx_sc::module]
pub trait LogicModule:
    crate::storage::Storage
    + crate::oracle::OracleModule
    + crate::pool::PoolModule
    + crate::validation::ValidationModule
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + common_events::EventsModule
    + multiversx_sc_modules::pause::PauseModule
{
    // --- Accrual ---

    /// Brings every reserve's indices to `now`.
    ///
    /// Borrow index compounds, supply index grows linearly; the borrow-side growth times the
    /// reserve factor is credited to the treasury as scaled supply at the new supply index.
    fn update_state_of_all(&self, now: u64) {
        let count = self.reserves_count().get();
        for asset_id in 0..count {
            self.update_reserve_state(asset_id, now);
        }
    }

    fn update_reserve_state(&self, asset_id: u16, now: u64) {
        let reserve = self.reserve(asset_id).get();
        if now <= reserve.last_update_timestamp {
            return;
        }

        let elapsed = now - reserve.last_update_timestamp;

        let borrow_factor = self.calculate_compounded_interest(&reserve.current_borrow_rate, elapsed);
        let supply_factor = self.calculate_linear_interest(&reserve.current_supply_rate, elapsed);

        let new_borrow_index = self.ray_mul(&reserve.current_borrow_index, &borrow_factor);
        let new_supply_index = self.ray_mul(&reserve.current_supply_index, &supply_factor);

        let borrow_growth = new_borrow_index.clone() - reserve.current_borrow_index.clone();
        let treasury_real = self.ray_mul(
            &self.ray_mul(&reserve.total_borrow, &borrow_growth),
            &reserve.borrow_rate_factors.reserve_factor,
        );
        let scaled_treasury = self.ray_div(&treasury_real, &new_supply_index);

        self.update_state(
            asset_id,
            new_supply_index,
            new_borrow_index,
            now,
            &scaled_treasury,
        );

        self.emit_reserve_state(asset_id);
    }

    /// Re-prices the rate curve from the current utilization.
    fn refresh_interest_rate(&self, asset_id: u16) {
        let reserve = self.get_reserve(asset_id);
        let (real_supply, real_borrow) = self.get_real_totals(&reserve);

        let utilization = self.get_utilization(&real_borrow, &real_supply);
        let borrow_rate = self.calc_borrow_rate(&utilization, &reserve.borrow_rate_factors);
        let supply_rate = self.calc_supply_rate(
            &utilization,
            &borrow_rate,
            &reserve.borrow_rate_factors.reserve_factor,
        );

        self.update_interest_rate(asset_id, borrow_rate, supply_rate);
        self.emit_reserve_state(asset_id);
    }

    /// Spreads `amount` (normalized) over every supplier of `asset_id`.
    fn cumulate_to_supply_index(&self, asset_id: u16, amount: &ManagedDecimal<Self::Api, NumDecimals>) {
        let reserve = self.get_reserve(asset_id);
        let new_index = self.cumulate_index(
            &reserve.total_supply,
            &reserve.current_supply_index,
            amount,
        );
        self.update_supply_index(asset_id, new_index);
    }

    fn emit_reserve_state(&self, asset_id: u16) {
        let reserve = self.reserve(asset_id).get();
        self.reserve_state_event(
            asset_id,
            &reserve.current_supply_index,
            &reserve.current_borrow_index,
            &reserve.current_supply_rate,
            &reserve.current_borrow_rate,
            &reserve.treasury_balance,
            reserve.last_update_timestamp,
        );
    }

    // --- Valuation ---

    /// Real supplied amount of `user`, 9 decimals.
    fn user_collateral_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let (scaled, _) = self.get_user_balance(asset_id, user);
        let (supply_index, _) = self.get_index(asset_id);
        self.scaled_to_original(&scaled, &supply_index, NORMAL_DECIMALS)
    }

    /// Real borrowed amount of `user`, 9 decimals.
    fn user_loan_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let (_, scaled) = self.get_user_balance(asset_id, user);
        let (_, borrow_index) = self.get_index(asset_id);
        self.scaled_to_original(&scaled, &borrow_index, NORMAL_DECIMALS)
    }

    fn user_collateral_value(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let balance = self.user_collateral_balance(asset_id, user);
        self.calculate_value(cache, asset_id, &balance)
    }

    fn user_loan_value(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let balance = self.user_loan_balance(asset_id, user);
        self.calculate_value(cache, asset_id, &balance)
    }

    /// Sum of collateral values across the user's collateral set, WAD.
    fn user_total_collateral_value(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut total = self.wad_zero();
        for asset_id in self.user_collaterals(user).iter() {
            total += &self.user_collateral_value(cache, asset_id, user);
        }
        total
    }

    fn user_total_loan_value(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut total = self.wad_zero();
        for asset_id in self.user_loans(user).iter() {
            total += &self.user_loan_value(cache, asset_id, user);
        }
        total
    }

    /// Returns `(Σ value_i * threshold_i, Σ value_i * ltv_i, Σ value_i)` over the collateral set.
    fn weighted_collateral(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mut weighted_threshold = self.wad_zero();
        let mut weighted_ltv = self.wad_zero();
        let mut total_value = self.wad_zero();

        for asset_id in self.user_collaterals(user).iter() {
            let reserve = self.get_reserve(asset_id);
            let value = self.user_collateral_value(cache, asset_id, user);

            weighted_threshold += &self.wad_mul(&value, &reserve.liquidation_factors.threshold);
            weighted_ltv += &self.wad_mul(&value, &reserve.ltv);
            total_value += &value;
        }

        (weighted_threshold, weighted_ltv, total_value)
    }

    /// `Σ(collateral_i * threshold_i) / Σ loan_i` at RAY; the maximum sentinel without loans.
    fn user_health_factor(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let loan_value = self.user_total_loan_value(cache, user);
        if loan_value == self.wad_zero() {
            return self.max_health_factor();
        }

        let (weighted_threshold, _, _) = self.weighted_collateral(cache, user);
        self.ray_div(&weighted_threshold, &loan_value)
    }

    fn max_health_factor(&self) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.to_decimal_ray(BigUint::from(u128::MAX))
    }

    fn is_health(&self, cache: &mut Cache<Self>, user: &ManagedAddress) -> bool {
        self.user_health_factor(cache, user) >= self.ray()
    }

    /// Value-weighted liquidation threshold over the collateral set, RAY.
    fn dynamic_liquidation_threshold(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let (weighted_threshold, _, total_value) = self.weighted_collateral(cache, user);
        if total_value == self.wad_zero() {
            return self.ray_zero();
        }
        self.ray_div(&weighted_threshold, &total_value)
    }

    fn calculate_avg_ltv(
        &self,
        cache: &mut Cache<Self>,
        user: &ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let (_, weighted_ltv, total_value) = self.weighted_collateral(cache, user);
        if total_value == self.wad_zero() {
            return self.ray_zero();
        }
        self.ray_div(&weighted_ltv, &total_value)
    }

    // --- Transitions ---

    /// Credits `amount` (normalized) of supply to `user`.
    fn execute_deposit(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.update_state_of_all(cache.current_timestamp);
        self.validate_deposit(asset_id, coin_type, amount);

        let (supply_index, _) = self.get_index(asset_id);
        let scaled = self.original_to_scaled(amount, &supply_index);

        self.increase_supply_balance(asset_id, user, &scaled);
        self.update_user_collaterals(asset_id, user);
        self.refresh_interest_rate(asset_id);

        self.deposit_event(asset_id, user, amount);
    }

    /// Debits up to `amount` (normalized) of supply from `user` and returns what was actually
    /// withdrawn. A remainder at or under the dust threshold is swept into the treasury.
    fn execute_withdraw(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.update_state_of_all(cache.current_timestamp);
        self.validate_withdraw(asset_id, amount);

        let balance = self.user_collateral_balance(asset_id, user);
        require!(
            balance.into_raw_units() > &BigUint::zero(),
            ERROR_INSUFFICIENT_BALANCE
        );

        let is_full = amount >= &balance;
        let actual_amount = if is_full { balance.clone() } else { amount.clone() };
        self.require_reserve_liquidity(asset_id, &actual_amount);

        let (supply_index, _) = self.get_index(asset_id);
        let (scaled_balance, _) = self.get_user_balance(asset_id, user);
        let scaled = if is_full {
            scaled_balance
        } else {
            self.get_min(
                self.original_to_scaled(&actual_amount, &supply_index),
                scaled_balance,
            )
        };
        self.decrease_supply_balance(asset_id, user, &scaled);

        let remaining = self.user_collateral_balance(asset_id, user);
        if remaining.into_raw_units() <= &BigUint::from(DUST_THRESHOLD) {
            let (dust_scaled, _) = self.get_user_balance(asset_id, user);
            if dust_scaled != self.ray_zero() {
                self.decrease_supply_balance(asset_id, user, &dust_scaled);
                self.increase_treasury_balance(asset_id, &dust_scaled);
                self.dust_swept_event(asset_id, user, &remaining);
            }
            self.remove_user_collaterals(asset_id, user);
        }

        require!(self.is_health(cache, user), ERROR_USER_UNHEALTHY);

        self.refresh_interest_rate(asset_id);
        self.withdraw_event(asset_id, user, &actual_amount);

        actual_amount
    }

    /// Records `amount` (normalized) of new debt. The resulting health factor must stay above
    /// `avg_threshold / avg_ltv`, which leaves headroom under the liquidation line.
    fn execute_borrow(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.update_state_of_all(cache.current_timestamp);
        self.validate_borrow(asset_id, amount);

        let (_, borrow_index) = self.get_index(asset_id);
        let scaled = self.original_to_scaled(amount, &borrow_index);

        self.increase_borrow_balance(asset_id, user, &scaled);
        self.update_user_loans(asset_id, user);

        let avg_threshold = self.dynamic_liquidation_threshold(cache, user);
        let avg_ltv = self.calculate_avg_ltv(cache, user);
        require!(
            avg_threshold > self.ray_zero() && avg_ltv > self.ray_zero(),
            ERROR_INSUFFICIENT_COLLATERAL
        );

        let bound = self.ray_div(&avg_threshold, &avg_ltv);
        let health_factor = self.user_health_factor(cache, user);
        require!(health_factor >= bound, ERROR_USER_UNHEALTHY);

        self.refresh_interest_rate(asset_id);
        self.borrow_event(asset_id, user, amount);
    }

    /// Repays up to the outstanding debt and returns the unused part of `amount`.
    fn execute_repay(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.update_state_of_all(cache.current_timestamp);
        self.validate_repay(asset_id, coin_type, user, amount);

        let repaid = self.reduce_debt(asset_id, user, amount);
        self.refresh_interest_rate(asset_id);
        self.repay_event(asset_id, user, &repaid);

        amount.clone() - repaid
    }

    /// Burns up to `amount` of `user`'s debt, clearing the loan flag when it reaches zero.
    /// Returns the amount actually repaid.
    fn reduce_debt(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let debt = self.user_loan_balance(asset_id, user);
        let (_, scaled_debt) = self.get_user_balance(asset_id, user);

        if amount >= &debt {
            self.decrease_borrow_balance(asset_id, user, &scaled_debt);
            self.remove_user_loans(asset_id, user);
            return debt;
        }

        let (_, borrow_index) = self.get_index(asset_id);
        let scaled = self.get_min(self.original_to_scaled(amount, &borrow_index), scaled_debt);
        self.decrease_borrow_balance(asset_id, user, &scaled);

        amount.clone()
    }

    /// Repays `amount` of `user`'s `debt_asset` loan in exchange for discounted collateral.
    ///
    /// The seized value is `min(collateral * ratio, loan, repayment, collateral / (1 + bonus))`.
    /// The bonus on top of it is split between the liquidator and the treasury by
    /// `treasury_factor`.
    fn execute_liquidate(
        &self,
        cache: &mut Cache<Self>,
        debt_asset: u16,
        collateral_asset: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        user: &ManagedAddress,
        liquidator: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> LiquidationResult<Self::Api> {
        self.update_state_of_all(cache.current_timestamp);
        self.validate_liquidate(debt_asset, collateral_asset, coin_type, user, amount);
        require!(!self.is_health(cache, user), ERROR_USER_HEALTHY);

        let result = self.calculate_liquidation(cache, debt_asset, collateral_asset, user, amount);

        let repaid = self.reduce_debt(debt_asset, user, &result.debt_repaid);

        let (supply_index, _) = self.get_index(collateral_asset);
        let (scaled_collateral, _) = self.get_user_balance(collateral_asset, user);
        let seized = result.liquidator_collateral.clone() + result.treasury_collateral.clone();
        let seized_scaled = self.get_min(
            self.original_to_scaled(&seized, &supply_index),
            scaled_collateral,
        );
        self.decrease_supply_balance(collateral_asset, user, &seized_scaled);

        let treasury_scaled = self.original_to_scaled(&result.treasury_collateral, &supply_index);
        self.increase_treasury_balance(collateral_asset, &treasury_scaled);

        let (remaining, _) = self.get_user_balance(collateral_asset, user);
        if remaining == self.ray_zero() {
            self.remove_user_collaterals(collateral_asset, user);
        }

        self.refresh_interest_rate(debt_asset);
        self.refresh_interest_rate(collateral_asset);

        let loan_closed = !self.user_loans(user).contains(&debt_asset);
        self.liquidation_event(
            collateral_asset,
            debt_asset,
            user,
            liquidator,
            &result.liquidator_collateral,
            &result.treasury_collateral,
            &repaid,
            loan_closed,
        );

        LiquidationResult {
            excess: amount.clone() - repaid.clone(),
            debt_repaid: repaid,
            loan_closed,
            ..result
        }
    }

    fn calculate_liquidation(
        &self,
        cache: &mut Cache<Self>,
        debt_asset: u16,
        collateral_asset: u16,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> LiquidationResult<Self::Api> {
        let collateral_reserve = self.get_reserve(collateral_asset);
        let factors = &collateral_reserve.liquidation_factors;

        let collateral_value = self.user_collateral_value(cache, collateral_asset, user);
        let loan_value = self.user_loan_value(cache, debt_asset, user);
        let repay_value = self.calculate_value(cache, debt_asset, amount);

        let ratio_cap = self.wad_mul(&collateral_value, &factors.ratio);
        let bonus_cap = self.wad_div(&collateral_value, &(self.ray() + factors.bonus.clone()));

        let liquidable_value = self.get_min(
            self.get_min(ratio_cap, loan_value),
            self.get_min(repay_value, bonus_cap),
        );

        let total_bonus = self.wad_mul(&liquidable_value, &factors.bonus);
        let treasury_value = self.wad_mul(&total_bonus, &collateral_reserve.treasury_factor);
        let liquidator_value = liquidable_value.clone() + total_bonus - treasury_value.clone();

        let balance = self.user_collateral_balance(collateral_asset, user);
        let treasury_collateral = self.get_min(
            self.calculate_amount(cache, collateral_asset, &treasury_value),
            balance.clone(),
        );
        let liquidator_collateral = self.get_min(
            self.calculate_amount(cache, collateral_asset, &liquidator_value),
            balance - treasury_collateral.clone(),
        );

        let debt_repaid = self.get_min(
            self.calculate_amount(cache, debt_asset, &liquidable_value),
            amount.clone(),
        );

        LiquidationResult {
            liquidator_collateral,
            treasury_collateral,
            excess: amount.clone() - debt_repaid.clone(),
            debt_repaid,
            loan_closed: false,
        }
    }
}
