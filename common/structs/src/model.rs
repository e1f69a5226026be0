#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Piecewise-linear borrow rate curve, all values ray-scaled and annual.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct BorrowRateFactors<M: ManagedTypeApi> {
    pub base_rate: ManagedDecimal<M, NumDecimals>,
    pub multiplier: ManagedDecimal<M, NumDecimals>,
    pub jump_rate_multiplier: ManagedDecimal<M, NumDecimals>,
    pub reserve_factor: ManagedDecimal<M, NumDecimals>,
    pub optimal_utilization: ManagedDecimal<M, NumDecimals>,
}

/// Liquidation parameters of a collateral asset, ray-scaled.
///
/// - `ratio`: share of the collateral value a single liquidation may seize
/// - `bonus`: discount granted on seized collateral
/// - `threshold`: weight of the collateral value in the health factor
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct LiquidationFactors<M: ManagedTypeApi> {
    pub ratio: ManagedDecimal<M, NumDecimals>,
    pub bonus: ManagedDecimal<M, NumDecimals>,
    pub threshold: ManagedDecimal<M, NumDecimals>,
}

/// Ledger entry of one supported asset.
///
/// Balances (`total_supply`, `total_borrow`, `treasury_balance`) are scaled amounts:
/// the real amount is `scaled * index`, so accrued interest never needs a per-user write.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct ReserveData<M: ManagedTypeApi> {
    pub asset_id: u16,
    pub coin_type: EgldOrEsdtTokenIdentifier<M>,
    pub oracle_id: u16,
    pub pool_id: u16,
    pub decimals: usize,
    pub is_isolated: bool,
    pub supply_cap_ceiling: ManagedDecimal<M, NumDecimals>,
    pub borrow_cap_ceiling: ManagedDecimal<M, NumDecimals>,
    pub ltv: ManagedDecimal<M, NumDecimals>,
    pub treasury_factor: ManagedDecimal<M, NumDecimals>,
    pub borrow_rate_factors: BorrowRateFactors<M>,
    pub liquidation_factors: LiquidationFactors<M>,
    pub current_supply_rate: ManagedDecimal<M, NumDecimals>,
    pub current_borrow_rate: ManagedDecimal<M, NumDecimals>,
    pub current_supply_index: ManagedDecimal<M, NumDecimals>,
    pub current_borrow_index: ManagedDecimal<M, NumDecimals>,
    pub last_update_timestamp: u64,
    pub total_supply: ManagedDecimal<M, NumDecimals>,
    pub total_borrow: ManagedDecimal<M, NumDecimals>,
    pub treasury_balance: ManagedDecimal<M, NumDecimals>,
}

impl<M: ManagedTypeApi> ReserveData<M> {
    pub fn is_same_coin(&self, coin_type: &EgldOrEsdtTokenIdentifier<M>) -> bool {
        &self.coin_type == coin_type
    }
}

/// Token reservoir backing a reserve. Amounts are in the token's native decimals.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct PoolData<M: ManagedTypeApi> {
    pub coin_type: EgldOrEsdtTokenIdentifier<M>,
    pub decimals: usize,
    pub balance: BigUint<M>,
    pub treasury_balance: BigUint<M>,
}

/// Flash loan terms of an asset. Fee rates are expressed over `FLASH_LOAN_FEE_MULTIPLE`,
/// bounds in the token's native decimals.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct FlashLoanConfig<M: ManagedTypeApi> {
    pub asset_id: u16,
    pub coin_type: EgldOrEsdtTokenIdentifier<M>,
    pub pool_id: u16,
    pub rate_to_supplier: u64,
    pub rate_to_treasury: u64,
    pub min: BigUint<M>,
    pub max: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct PriceFeed<M: ManagedTypeApi> {
    pub price: ManagedDecimal<M, NumDecimals>,
    pub timestamp: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Eq, Debug)]
pub enum LeaderboardStatus {
    Pending,
    Active,
    Deactivated,
    Removed,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct LeaderboardInfo<M: ManagedTypeApi> {
    pub id: u64,
    pub key: ManagedBuffer<M>,
    pub start_ts: u64,
    pub end_ts: u64,
    pub status: LeaderboardStatus,
}

impl<M: ManagedTypeApi> LeaderboardInfo<M> {
    pub fn is_pending(&self) -> bool {
        self.status == LeaderboardStatus::Pending
    }

    pub fn is_active(&self) -> bool {
        self.status == LeaderboardStatus::Active
    }

    pub fn is_deactivated(&self) -> bool {
        self.status == LeaderboardStatus::Deactivated
    }

    pub fn is_removed(&self) -> bool {
        self.status == LeaderboardStatus::Removed
    }

    /// `start_ts <= now < end_ts`
    pub fn is_live_at(&self, now: u64) -> bool {
        self.is_active() && self.start_ts <= now && now < self.end_ts
    }
}

/// All users tied on `score`, in the order they reached it.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone)]
pub struct RankingPage<M: ManagedTypeApi> {
    pub score: u64,
    pub users: ManagedVec<M, ManagedAddress<M>>,
}
