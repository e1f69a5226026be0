multiversx_sc::imports!();

use common_constants::NORMAL_DECIMALS;
use common_errors::ERROR_INSUFFICIENT_LIQUIDITY;
use common_structs::PoolData;

/// Token reservoirs. A pool tracks what the contract actually holds for one coin:
/// `balance` is lendable liquidity, `treasury_balance` protocol fees not yet claimed.
/// Amounts here are native token units; the ledger works on the 9-decimal normalized scale.
#[multiversx_sc::module]
pub trait PoolModule {
    #[storage_mapper("pool")]
    fn pool(&self, pool_id: u16) -> SingleValueMapper<PoolData<Self::Api>>;

    fn create_pool(&self, pool_id: u16, coin_type: &EgldOrEsdtTokenIdentifier, decimals: usize) {
        self.pool(pool_id).set(PoolData {
            coin_type: coin_type.clone(),
            decimals,
            balance: BigUint::zero(),
            treasury_balance: BigUint::zero(),
        });
    }

    fn deposit_balance(&self, pool_id: u16, amount: &BigUint) {
        self.pool(pool_id).update(|pool| pool.balance += amount);
    }

    fn withdraw_balance(&self, pool_id: u16, amount: &BigUint) {
        self.pool(pool_id).update(|pool| {
            require!(&pool.balance >= amount, ERROR_INSUFFICIENT_LIQUIDITY);
            pool.balance -= amount;
        });
    }

    fn deposit_treasury(&self, pool_id: u16, amount: &BigUint) {
        self.pool(pool_id)
            .update(|pool| pool.treasury_balance += amount);
    }

    fn withdraw_treasury(&self, pool_id: u16, amount: &BigUint) {
        self.pool(pool_id).update(|pool| {
            require!(&pool.treasury_balance >= amount, ERROR_INSUFFICIENT_LIQUIDITY);
            pool.treasury_balance -= amount;
        });
    }

    /// Native units to the 9-decimal ledger scale. Digits beyond the ninth are truncated.
    fn normal_amount(&self, pool_id: u16, amount: &BigUint) -> ManagedDecimal<Self::Api, NumDecimals> {
        let pool = self.pool(pool_id).get();
        ManagedDecimal::from_raw_units(amount.clone(), pool.decimals).rescale(NORMAL_DECIMALS)
    }

    fn unnormal_amount(
        &self,
        pool_id: u16,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> BigUint {
        let pool = self.pool(pool_id).get();
        amount.rescale(pool.decimals).into_raw_units().clone()
    }

    /// Native units to collect for a ledger `amount`, rounded up and capped at `payment`.
    fn collected_amount(
        &self,
        pool_id: u16,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        payment: &BigUint,
    ) -> BigUint {
        let pool = self.pool(pool_id).get();
        let native = amount.rescale(pool.decimals);

        let mut collected = native.into_raw_units().clone();
        if native.rescale(amount.scale()).into_raw_units() < amount.into_raw_units() {
            collected += BigUint::from(1u32);
        }

        if &collected > payment {
            payment.clone()
        } else {
            collected
        }
    }

    fn send_asset(&self, pool_id: u16, to: &ManagedAddress, amount: &BigUint) {
        let coin_type = self.pool(pool_id).get().coin_type;
        self.tx()
            .to(to)
            .egld_or_single_esdt(&coin_type, 0, amount)
            .transfer_if_not_empty();
    }
}
