multiversx_sc::imports!();

use common_constants::NORMAL_DECIMALS;
use common_errors::ERROR_RESERVE_NOT_FOUND;
use common_structs::{PoolData, PriceFeed, ReserveData};

use crate::cache::Cache;

/// Read-only queries. Values derive from the indices of the last accrual; call `updateState`
/// first for figures accurate to the current block.
#[multiversx_sc::module]
pub trait ViewsModule:
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
    #[view(getAssetId)]
    fn get_asset_id(&self, coin_type: EgldOrEsdtTokenIdentifier) -> u16 {
        match self.asset_ids().get(&coin_type) {
            Some(asset_id) => asset_id,
            None => sc_panic!(ERROR_RESERVE_NOT_FOUND),
        }
    }

    #[view(getReserve)]
    fn get_reserve_view(&self, asset_id: u16) -> ReserveData<Self::Api> {
        self.get_reserve(asset_id)
    }

    /// Real `(supply, borrow)` of `user`, 9 decimals.
    #[view(getUserBalance)]
    fn get_user_balance_view(
        &self,
        asset_id: u16,
        user: ManagedAddress,
    ) -> MultiValue2<ManagedDecimal<Self::Api, NumDecimals>, ManagedDecimal<Self::Api, NumDecimals>>
    {
        (
            self.user_collateral_balance(asset_id, &user),
            self.user_loan_balance(asset_id, &user),
        )
            .into()
    }

    #[view(getUserAssets)]
    fn get_user_assets_view(
        &self,
        user: ManagedAddress,
    ) -> MultiValue2<ManagedVec<u16>, ManagedVec<u16>> {
        self.get_user_assets(&user).into()
    }

    #[view(getHealthFactor)]
    fn get_health_factor(&self, user: ManagedAddress) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut cache = Cache::new(self);
        self.user_health_factor(&mut cache, &user)
    }

    #[view(getHealthFactors)]
    fn get_health_factors(
        &self,
        users: MultiValueEncoded<ManagedAddress>,
    ) -> MultiValueEncoded<ManagedDecimal<Self::Api, NumDecimals>> {
        let mut cache = Cache::new(self);
        let mut result = MultiValueEncoded::new();
        for user in users {
            result.push(self.user_health_factor(&mut cache, &user));
        }
        result
    }

    #[view(getUserCollateralValue)]
    fn get_user_collateral_value(
        &self,
        user: ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut cache = Cache::new(self);
        self.user_total_collateral_value(&mut cache, &user)
    }

    #[view(getUserLoanValue)]
    fn get_user_loan_value(&self, user: ManagedAddress) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut cache = Cache::new(self);
        self.user_total_loan_value(&mut cache, &user)
    }

    #[view(getDynamicLiquidationThreshold)]
    fn get_dynamic_liquidation_threshold(
        &self,
        user: ManagedAddress,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let mut cache = Cache::new(self);
        self.dynamic_liquidation_threshold(&mut cache, &user)
    }

    #[view(getUtilization)]
    fn get_utilization_view(&self, asset_id: u16) -> ManagedDecimal<Self::Api, NumDecimals> {
        let reserve = self.get_reserve(asset_id);
        let (real_supply, real_borrow) = self.get_real_totals(&reserve);
        self.get_utilization(&real_borrow, &real_supply)
    }

    /// Real treasury supply of `asset_id`, 9 decimals.
    #[view(getTreasuryBalance)]
    fn get_treasury_balance_view(&self, asset_id: u16) -> ManagedDecimal<Self::Api, NumDecimals> {
        let reserve = self.get_reserve(asset_id);
        self.scaled_to_original(
            &reserve.treasury_balance,
            &reserve.current_supply_index,
            NORMAL_DECIMALS,
        )
    }

    #[view(getPool)]
    fn get_pool(&self, pool_id: u16) -> PoolData<Self::Api> {
        self.require_reserve_exists(pool_id);
        self.pool(pool_id).get()
    }

    #[view(getPrice)]
    fn get_price_view(&self, oracle_id: u16) -> PriceFeed<Self::Api> {
        self.get_price(oracle_id, self.blockchain().get_block_timestamp())
    }
}
