multiversx_sc::imports!();

use common_constants::{NORMAL_DECIMALS, WAD_PRECISION};
use common_errors::{
    ERROR_INVALID_PRICE, ERROR_NOT_PRICE_FEEDER, ERROR_PRICE_FEED_NOT_FOUND, ERROR_PRICE_FEED_STALE,
};
use common_structs::PriceFeed;

use crate::cache::Cache;

/// Push-style price source. Whitelisted feeders publish one USD price per `oracle_id`;
/// readers reject feeds older than `max_price_age` seconds.
#[multiversx_sc::module]
pub trait OracleModule:
    crate::storage::Storage
    + common_math::SharedMathModule
    + common_events::EventsModule
    + multiversx_sc_modules::pause::PauseModule
{
    #[view(getPriceFeed)]
    #[storage_mapper("price_feed")]
    fn price_feed(&self, oracle_id: u16) -> SingleValueMapper<PriceFeed<Self::Api>>;

    #[view(getPriceFeeders)]
    #[storage_mapper("price_feeders")]
    fn price_feeders(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[view(getMaxPriceAge)]
    #[storage_mapper("max_price_age")]
    fn max_price_age(&self) -> SingleValueMapper<u64>;

    /// Publishes `price` (WAD, USD per whole token) for `oracle_id`.
    #[endpoint(setPrice)]
    fn set_price(&self, oracle_id: u16, price: BigUint) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.blockchain().get_owner_address()
                || self.price_feeders().contains(&caller),
            ERROR_NOT_PRICE_FEEDER
        );
        require!(price > 0, ERROR_INVALID_PRICE);

        let timestamp = self.blockchain().get_block_timestamp();
        let feed = PriceFeed {
            price: self.to_decimal_wad(price),
            timestamp,
        };

        self.price_feed(oracle_id).set(&feed);
        self.price_update_event(oracle_id, &feed.price, timestamp);
    }

    fn get_price(&self, oracle_id: u16, now: u64) -> PriceFeed<Self::Api> {
        let mapper = self.price_feed(oracle_id);
        require!(!mapper.is_empty(), ERROR_PRICE_FEED_NOT_FOUND);

        let feed = mapper.get();
        require!(
            now <= feed.timestamp + self.max_price_age().get(),
            ERROR_PRICE_FEED_STALE
        );

        feed
    }

    /// USD value (WAD) of a normalized `amount` of `asset_id`.
    fn calculate_value(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let reserve = self.get_reserve(asset_id);
        let price = cache.get_cached_price(reserve.oracle_id);

        self.mul_half_up(amount, &price, WAD_PRECISION)
    }

    /// Normalized amount of `asset_id` worth `value` USD.
    fn calculate_amount(
        &self,
        cache: &mut Cache<Self>,
        asset_id: u16,
        value: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let reserve = self.get_reserve(asset_id);
        let price = cache.get_cached_price(reserve.oracle_id);

        self.div_half_up(value, &price, NORMAL_DECIMALS)
    }
}
