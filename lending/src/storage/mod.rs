multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use common_constants::PROTOCOL_VERSION;
use common_errors::{
    ERROR_FLASHLOAN_ONGOING, ERROR_INCORRECT_VERSION, ERROR_INSUFFICIENT_BALANCE, ERROR_PAUSED,
    ERROR_RESERVE_NOT_FOUND,
};
use common_structs::{BorrowRateFactors, FlashLoanConfig, LiquidationFactors, ReserveData};

/// Persistent per-asset bookkeeping.
///
/// Every balance handled here is a *scaled* amount: callers convert real amounts with the
/// current index before calling a mutator. Mutators keep the per-user entry and the reserve
/// aggregate in step.
#[multiversx_sc::module]
pub trait Storage:
    common_math::SharedMathModule + multiversx_sc_modules::pause::PauseModule
{
    /// Number of registered reserves; asset ids are allocated densely from zero.
    #[view(getReservesCount)]
    #[storage_mapper("reserves_count")]
    fn reserves_count(&self) -> SingleValueMapper<u16>;

    #[storage_mapper("reserve")]
    fn reserve(&self, asset_id: u16) -> SingleValueMapper<ReserveData<Self::Api>>;

    /// Reserve id of every registered coin.
    #[storage_mapper("asset_ids")]
    fn asset_ids(&self) -> MapMapper<EgldOrEsdtTokenIdentifier, u16>;

    #[storage_mapper("user_supply")]
    fn user_supply(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[storage_mapper("user_borrow")]
    fn user_borrow(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>;

    #[view(getUserCollaterals)]
    #[storage_mapper("user_collaterals")]
    fn user_collaterals(&self, user: &ManagedAddress) -> UnorderedSetMapper<u16>;

    #[view(getUserLoans)]
    #[storage_mapper("user_loans")]
    fn user_loans(&self, user: &ManagedAddress) -> UnorderedSetMapper<u16>;

    /// Flash-loanable coins and the reserve lending each of them.
    #[storage_mapper("flash_loan_assets")]
    fn flash_loan_assets(&self) -> MapMapper<EgldOrEsdtTokenIdentifier, u16>;

    #[view(getFlashLoanConfig)]
    #[storage_mapper("flash_loan_config")]
    fn flash_loan_config(&self, asset_id: u16) -> SingleValueMapper<FlashLoanConfig<Self::Api>>;

    #[view(getVersion)]
    #[storage_mapper("version")]
    fn version(&self) -> SingleValueMapper<u64>;

    #[view(isFlashLoanOngoing)]
    #[storage_mapper("flash_loan_ongoing")]
    fn flash_loan_ongoing(&self) -> SingleValueMapper<bool>;

    // --- Accessors ---

    fn require_reserve_exists(&self, asset_id: u16) {
        require!(
            asset_id < self.reserves_count().get(),
            ERROR_RESERVE_NOT_FOUND
        );
    }

    fn get_reserve(&self, asset_id: u16) -> ReserveData<Self::Api> {
        self.require_reserve_exists(asset_id);
        self.reserve(asset_id).get()
    }

    /// Returns `(supply_index, borrow_index)`.
    fn get_index(
        &self,
        asset_id: u16,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let reserve = self.get_reserve(asset_id);
        (reserve.current_supply_index, reserve.current_borrow_index)
    }

    /// Returns the scaled `(total_supply, total_borrow)`.
    fn get_total_supply(
        &self,
        asset_id: u16,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let reserve = self.get_reserve(asset_id);
        (reserve.total_supply, reserve.total_borrow)
    }

    /// Returns the scaled `(supply, borrow)` balances of `user`.
    fn get_user_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
    ) -> (
        ManagedDecimal<Self::Api, NumDecimals>,
        ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        (
            self.scaled_or_zero(&self.user_supply(asset_id, user)),
            self.scaled_or_zero(&self.user_borrow(asset_id, user)),
        )
    }

    fn get_borrow_rate_factors(&self, asset_id: u16) -> BorrowRateFactors<Self::Api> {
        self.get_reserve(asset_id).borrow_rate_factors
    }

    fn get_liquidation_factors(&self, asset_id: u16) -> LiquidationFactors<Self::Api> {
        self.get_reserve(asset_id).liquidation_factors
    }

    fn get_treasury_balance(&self, asset_id: u16) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.get_reserve(asset_id).treasury_balance
    }

    /// Returns the asset ids `user` supplies and borrows.
    fn get_user_assets(&self, user: &ManagedAddress) -> (ManagedVec<u16>, ManagedVec<u16>) {
        let mut collaterals = ManagedVec::new();
        for asset_id in self.user_collaterals(user).iter() {
            collaterals.push(asset_id);
        }

        let mut loans = ManagedVec::new();
        for asset_id in self.user_loans(user).iter() {
            loans.push(asset_id);
        }

        (collaterals, loans)
    }

    fn scaled_or_zero(
        &self,
        mapper: &SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if mapper.is_empty() {
            self.ray_zero()
        } else {
            mapper.get()
        }
    }

    // --- Mutators ---

    fn increase_supply_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mapper = self.user_supply(asset_id, user);
        let balance = self.scaled_or_zero(&mapper) + scaled_amount.clone();
        mapper.set(&balance);

        self.reserve(asset_id).update(|reserve| {
            reserve.total_supply += scaled_amount;
        });
    }

    fn decrease_supply_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mapper = self.user_supply(asset_id, user);
        let balance = self.scaled_or_zero(&mapper);
        require!(&balance >= scaled_amount, ERROR_INSUFFICIENT_BALANCE);

        self.store_or_clear(&mapper, balance - scaled_amount.clone());

        self.reserve(asset_id).update(|reserve| {
            reserve.total_supply -= scaled_amount;
        });
    }

    fn increase_borrow_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mapper = self.user_borrow(asset_id, user);
        let balance = self.scaled_or_zero(&mapper) + scaled_amount.clone();
        mapper.set(&balance);

        self.reserve(asset_id).update(|reserve| {
            reserve.total_borrow += scaled_amount;
        });
    }

    fn decrease_borrow_balance(
        &self,
        asset_id: u16,
        user: &ManagedAddress,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        let mapper = self.user_borrow(asset_id, user);
        let balance = self.scaled_or_zero(&mapper);
        require!(&balance >= scaled_amount, ERROR_INSUFFICIENT_BALANCE);

        self.store_or_clear(&mapper, balance - scaled_amount.clone());

        self.reserve(asset_id).update(|reserve| {
            reserve.total_borrow -= scaled_amount;
        });
    }

    // Treasury supply counts towards the reserve's total supply
    fn increase_treasury_balance(
        &self,
        asset_id: u16,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.reserve(asset_id).update(|reserve| {
            reserve.treasury_balance += scaled_amount;
            reserve.total_supply += scaled_amount;
        });
    }

    fn decrease_treasury_balance(
        &self,
        asset_id: u16,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.reserve(asset_id).update(|reserve| {
            require!(
                &reserve.treasury_balance >= scaled_amount,
                ERROR_INSUFFICIENT_BALANCE
            );
            reserve.treasury_balance -= scaled_amount;
            reserve.total_supply -= scaled_amount;
        });
    }

    fn update_state(
        &self,
        asset_id: u16,
        new_supply_index: ManagedDecimal<Self::Api, NumDecimals>,
        new_borrow_index: ManagedDecimal<Self::Api, NumDecimals>,
        timestamp: u64,
        scaled_treasury_amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.reserve(asset_id).update(|reserve| {
            reserve.current_supply_index = new_supply_index;
            reserve.current_borrow_index = new_borrow_index;
            reserve.last_update_timestamp = timestamp;
        });
        self.increase_treasury_balance(asset_id, scaled_treasury_amount);
    }

    fn update_supply_index(&self, asset_id: u16, new_supply_index: ManagedDecimal<Self::Api, NumDecimals>) {
        self.reserve(asset_id).update(|reserve| {
            reserve.current_supply_index = new_supply_index;
        });
    }

    fn update_interest_rate(
        &self,
        asset_id: u16,
        borrow_rate: ManagedDecimal<Self::Api, NumDecimals>,
        supply_rate: ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        self.reserve(asset_id).update(|reserve| {
            reserve.current_borrow_rate = borrow_rate;
            reserve.current_supply_rate = supply_rate;
        });
    }

    fn update_user_collaterals(&self, asset_id: u16, user: &ManagedAddress) {
        self.user_collaterals(user).insert(asset_id);
    }

    fn update_user_loans(&self, asset_id: u16, user: &ManagedAddress) {
        self.user_loans(user).insert(asset_id);
    }

    fn remove_user_collaterals(&self, asset_id: u16, user: &ManagedAddress) {
        self.user_collaterals(user).swap_remove(&asset_id);
    }

    fn remove_user_loans(&self, asset_id: u16, user: &ManagedAddress) {
        self.user_loans(user).swap_remove(&asset_id);
    }

    fn store_or_clear(
        &self,
        mapper: &SingleValueMapper<ManagedDecimal<Self::Api, NumDecimals>>,
        balance: ManagedDecimal<Self::Api, NumDecimals>,
    ) {
        if balance == self.ray_zero() {
            mapper.clear();
        } else {
            mapper.set(&balance);
        }
    }

    // --- Gates ---

    fn when_not_paused(&self) {
        require!(self.not_paused(), ERROR_PAUSED);
    }

    fn version_verification(&self) {
        require!(
            self.version().get() == PROTOCOL_VERSION,
            ERROR_INCORRECT_VERSION
        );
    }

    fn reentrancy_guard(&self) {
        require!(!self.flash_loan_ongoing().get(), ERROR_FLASHLOAN_ONGOING);
    }

    /// Gate shared by every mutating endpoint.
    fn require_active(&self) {
        self.when_not_paused();
        self.version_verification();
        self.reentrancy_guard();
    }
}
