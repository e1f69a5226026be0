multiversx_sc::imports!();

use common_errors::{
    ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO, ERROR_BORROW_CAP, ERROR_INSUFFICIENT_BALANCE,
    ERROR_INSUFFICIENT_LIQUIDITY, ERROR_INVALID_COIN_TYPE, ERROR_INVALID_FLASHLOAN_RECEIVER,
    ERROR_INVALID_SHARD, ERROR_NO_COLLATERAL_IN_ASSET, ERROR_NO_LOAN_IN_ASSET, ERROR_SUPPLY_CAP,
};
use common_structs::ReserveData;

/// Preconditions checked against the freshly accrued reserve, before any balance moves.
#[multiversx_sc::module]
pub trait ValidationModule:
    crate::storage::Storage
    + common_math::SharedMathModule
    + common_rates::InterestRates
    + multiversx_sc_modules::pause::PauseModule
{
    fn require_amount_greater_than_zero(&self, amount: &ManagedDecimal<Self::Api, NumDecimals>) {
        require!(
            amount.into_raw_units() > &BigUint::zero(),
            ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO
        );
    }

    /// Real `(supply, borrow)` of a reserve on the 9-decimal scale.
    fn get_real_totals(
        &self,
        reserve: &ReserveData<Self::Api>,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        (
            self.scaled_to_original(
                &reserve.total_supply,
                &reserve.current_supply_index,
                common_constants::NORMAL_DECIMALS,
            ),
            self.scaled_to_original(
                &reserve.total_borrow,
                &reserve.current_borrow_index,
                common_constants::NORMAL_DECIMALS,
            ),
        )
    }

    /// Coin must match the reserve, the amount be positive, and the supply stay under the cap.
    fn validate_deposit(
        &self,
        asset_id: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let reserve = self.get_reserve(asset_id);
        require!(reserve.is_same_coin(coin_type), ERROR_INVALID_COIN_TYPE);
        self.require_amount_greater_than_zero(amount);

        let (real_supply, _) = self.get_real_totals(&reserve);
        require!(
            real_supply + amount.clone() <= reserve.supply_cap_ceiling,
            ERROR_SUPPLY_CAP
        );
    }

    fn validate_withdraw(&self, asset_id: u16, amount: &ManagedDecimal<Self::Api, NumDecimals>) {
        self.require_reserve_exists(asset_id);
        self.require_amount_greater_than_zero(amount);
    }

    /// Supply minus borrow must cover `amount`.
    fn require_reserve_liquidity(
        &self,
        asset_id: u16,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let reserve = self.get_reserve(asset_id);
        let (real_supply, real_borrow) = self.get_real_totals(&reserve);
        require!(
            real_borrow + amount.clone() <= real_supply,
            ERROR_INSUFFICIENT_LIQUIDITY
        );
    }

    /// Borrowing keeps real borrow under real supply and under
    /// `real_supply * borrow_cap_ceiling`.
    fn validate_borrow(&self, asset_id: u16, amount: &ManagedDecimal<Self::Api, NumDecimals>) {
        self.require_amount_greater_than_zero(amount);

        let reserve = self.get_reserve(asset_id);
        let (real_supply, real_borrow) = self.get_real_totals(&reserve);
        require!(
            real_supply.into_raw_units() > &BigUint::zero(),
            ERROR_INSUFFICIENT_BALANCE
        );

        let new_borrow = real_borrow + amount.clone();
        require!(new_borrow <= real_supply, ERROR_INSUFFICIENT_LIQUIDITY);

        let utilization = self.get_utilization(&new_borrow, &real_supply);
        require!(
            utilization <= reserve.borrow_cap_ceiling,
            ERROR_BORROW_CAP
        );
    }

    fn validate_repay(
        &self,
        asset_id: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let reserve = self.get_reserve(asset_id);
        require!(reserve.is_same_coin(coin_type), ERROR_INVALID_COIN_TYPE);
        self.require_amount_greater_than_zero(amount);
        require!(
            self.user_loans(user).contains(&asset_id),
            ERROR_NO_LOAN_IN_ASSET
        );
    }

    fn validate_liquidate(
        &self,
        debt_asset: u16,
        collateral_asset: u16,
        coin_type: &EgldOrEsdtTokenIdentifier,
        user: &ManagedAddress,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let debt_reserve = self.get_reserve(debt_asset);
        self.require_reserve_exists(collateral_asset);
        require!(debt_reserve.is_same_coin(coin_type), ERROR_INVALID_COIN_TYPE);
        self.require_amount_greater_than_zero(amount);

        require!(
            self.user_loans(user).contains(&debt_asset),
            ERROR_NO_LOAN_IN_ASSET
        );
        require!(
            self.user_collaterals(user).contains(&collateral_asset),
            ERROR_NO_COLLATERAL_IN_ASSET
        );
    }

    /// Flash loan receivers are called synchronously, so they must be contracts on this shard.
    fn validate_flash_loan_receiver(&self, contract_address: &ManagedAddress) {
        require!(
            self.blockchain().is_smart_contract(contract_address),
            ERROR_INVALID_FLASHLOAN_RECEIVER
        );

        let destination_shard_id = self.blockchain().get_shard_of_address(contract_address);
        let current_shard_id = self
            .blockchain()
            .get_shard_of_address(&self.blockchain().get_sc_address());

        require!(
            destination_shard_id == current_shard_id,
            ERROR_INVALID_SHARD
        );
    }
}
