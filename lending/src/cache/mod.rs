multiversx_sc::imports!();

/// Per-call memoization of oracle prices.
///
/// Health factor, liquidation and average ltv computations walk the same assets several
/// times within one endpoint; each oracle read is done once per call.
pub struct Cache<'a, C>
where
    C: crate::oracle::OracleModule + crate::storage::Storage,
{
    sc_ref: &'a C,
    pub prices_cache: ManagedMapEncoded<C::Api, u16, ManagedDecimal<C::Api, NumDecimals>>,
    pub current_timestamp: u64,
}

impl<'a, C> Cache<'a, C>
where
    C: crate::oracle::OracleModule + crate::storage::Storage,
{
    pub fn new(sc_ref: &'a C) -> Self {
        Cache {
            sc_ref,
            prices_cache: ManagedMapEncoded::new(),
            current_timestamp: sc_ref.blockchain().get_block_timestamp(),
        }
    }

    /// Price of one whole token of `oracle_id`, at WAD precision.
    pub fn get_cached_price(&mut self, oracle_id: u16) -> ManagedDecimal<C::Api, NumDecimals> {
        if self.prices_cache.contains(&oracle_id) {
            return self.prices_cache.get(&oracle_id);
        }

        let feed = self.sc_ref.get_price(oracle_id, self.current_timestamp);
        self.prices_cache.put(&oracle_id, &feed.price);

        feed.price
    }
}
