multiversx_sc::imports!();

use common_constants::FLASH_LOAN_FEE_MULTIPLE;
use common_errors::{
    ERROR_FLASH_LOAN_AMOUNT_OUT_OF_BOUNDS, ERROR_FLASH_LOAN_NOT_CONFIGURED,
    ERROR_INVALID_FLASHLOAN_REPAYMENT, ERROR_POOL_MISMATCH,
};

use crate::cache::Cache;

/// Proof of an outstanding flash loan. It has no codec derives, so it cannot be persisted;
/// `repay_flash_loan` consumes it by value.
pub struct FlashLoanReceipt<M: ManagedTypeApi> {
    pub user: ManagedAddress<M>,
    pub asset_id: u16,
    pub amount: BigUint<M>,
    pub pool_id: u16,
    pub fee_to_supplier: BigUint<M>,
    pub fee_to_treasury: BigUint<M>,
}

impl<M: ManagedTypeApi> FlashLoanReceipt<M> {
    pub fn required_repayment(&self) -> BigUint<M> {
        &self.amount + &self.fee_to_supplier + &self.fee_to_treasury
    }
}

#[multiversx_sc::module]
pub trait FlashLoanModule:
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
    /// Takes `amount` (native units) out of the pool configured for `coin_type`.
    fn loan(
        &self,
        cache: &mut Cache<Self>,
        coin_type: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
        user: &ManagedAddress,
    ) -> FlashLoanReceipt<Self::Api> {
        let asset_id = match self.flash_loan_assets().get(coin_type) {
            Some(asset_id) => asset_id,
            None => sc_panic!(ERROR_FLASH_LOAN_NOT_CONFIGURED),
        };

        let config = self.flash_loan_config(asset_id).get();
        require!(
            amount >= &config.min && amount <= &config.max,
            ERROR_FLASH_LOAN_AMOUNT_OUT_OF_BOUNDS
        );
        require!(
            &self.pool(config.pool_id).get().coin_type == coin_type,
            ERROR_POOL_MISMATCH
        );

        self.update_state_of_all(cache.current_timestamp);

        let multiple = BigUint::from(FLASH_LOAN_FEE_MULTIPLE);
        let fee_to_supplier = amount * &BigUint::from(config.rate_to_supplier) / &multiple;
        let fee_to_treasury = amount * &BigUint::from(config.rate_to_treasury) / &multiple;

        self.withdraw_balance(config.pool_id, amount);
        self.flash_loan_event(config.asset_id, user, amount);

        FlashLoanReceipt {
            user: user.clone(),
            asset_id: config.asset_id,
            amount: amount.clone(),
            pool_id: config.pool_id,
            fee_to_supplier,
            fee_to_treasury,
        }
    }

    /// Settles `receipt` against `repayment` (native units) and returns the excess.
    fn repay_flash_loan(&self, receipt: FlashLoanReceipt<Self::Api>, repayment: &BigUint) -> BigUint {
        let required = receipt.required_repayment();
        require!(repayment >= &required, ERROR_INVALID_FLASHLOAN_REPAYMENT);

        let FlashLoanReceipt {
            user,
            asset_id,
            amount,
            pool_id,
            fee_to_supplier,
            fee_to_treasury,
        } = receipt;

        self.deposit_balance(pool_id, &(&amount + &fee_to_supplier));
        self.deposit_treasury(pool_id, &fee_to_treasury);

        let normalized_fee = self.normal_amount(pool_id, &fee_to_supplier);
        self.cumulate_to_supply_index(asset_id, &normalized_fee);
        self.refresh_interest_rate(asset_id);

        self.flash_repay_event(asset_id, &user, &amount, &fee_to_supplier, &fee_to_treasury);

        repayment - &required
    }

    /// Reads what the receiver sent back for `coin_type` during the synchronous call.
    fn flash_loan_repayment(
        &self,
        coin_type: &EgldOrEsdtTokenIdentifier,
        back_transfers: &BackTransfers<Self::Api>,
    ) -> BigUint {
        require!(
            back_transfers.payments.len() == 1,
            ERROR_INVALID_FLASHLOAN_REPAYMENT
        );
        let payment = back_transfers.payments.get(0);
        require!(
            &payment.token_identifier == coin_type && payment.token_nonce == 0,
            ERROR_INVALID_FLASHLOAN_REPAYMENT
        );

        payment.amount.clone()
    }
}
