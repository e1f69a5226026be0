#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();
pub use common_structs::*;

#[multiversx_sc::module]
pub trait EventsModule {
    #[event("reserve_created")]
    fn reserve_created_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] coin_type: &EgldOrEsdtTokenIdentifier,
        #[indexed] oracle_id: u16,
        reserve: &ReserveData<Self::Api>,
    );

    #[event("reserve_config_updated")]
    fn reserve_config_updated_event(&self, #[indexed] asset_id: u16, reserve: &ReserveData<Self::Api>);

    // Emitted after every accrual and every rate recomputation
    #[event("reserve_state")]
    fn reserve_state_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] supply_index: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] borrow_index: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] supply_rate: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] borrow_rate: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] treasury_balance: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] timestamp: u64,
    );

    #[event("deposit")]
    fn deposit_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("withdraw")]
    fn withdraw_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("borrow")]
    fn borrow_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("repay")]
    fn repay_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("dust_swept")]
    fn dust_swept_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &ManagedDecimal<Self::Api, NumDecimals>,
    );

    #[event("liquidation")]
    fn liquidation_event(
        &self,
        #[indexed] collateral_asset: u16,
        #[indexed] debt_asset: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] liquidator: &ManagedAddress,
        #[indexed] collateral_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] treasury_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] debt_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] loan_closed: bool,
    );

    #[event("flash_loan")]
    fn flash_loan_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &BigUint,
    );

    #[event("flash_repay")]
    fn flash_repay_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] user: &ManagedAddress,
        #[indexed] amount: &BigUint,
        #[indexed] fee_to_supplier: &BigUint,
        #[indexed] fee_to_treasury: &BigUint,
    );

    #[event("flash_loan_config")]
    fn flash_loan_config_event(&self, #[indexed] asset_id: u16, config: &FlashLoanConfig<Self::Api>);

    #[event("treasury_withdraw")]
    fn treasury_withdraw_event(
        &self,
        #[indexed] asset_id: u16,
        #[indexed] recipient: &ManagedAddress,
        #[indexed] amount: &BigUint,
    );

    #[event("price_update")]
    fn price_update_event(
        &self,
        #[indexed] oracle_id: u16,
        #[indexed] price: &ManagedDecimal<Self::Api, NumDecimals>,
        #[indexed] timestamp: u64,
    );

    #[event("version_migrated")]
    fn version_migrated_event(&self, #[indexed] old_version: u64, #[indexed] new_version: u64);

    #[event("leaderboard_status")]
    fn leaderboard_status_event(
        &self,
        #[indexed] id: u64,
        #[indexed] key: &ManagedBuffer,
        #[indexed] start_ts: u64,
        #[indexed] end_ts: u64,
        #[indexed] status: &LeaderboardStatus,
    );

    // `delta` is signed through `is_deduction`; `new_score` is the score after the change
    #[event("leaderboard_score")]
    fn leaderboard_score_event(
        &self,
        #[indexed] id: u64,
        #[indexed] user: &ManagedAddress,
        #[indexed] delta: u64,
        #[indexed] is_deduction: bool,
        #[indexed] new_score: u64,
    );
}
