#![no_std]

use common_constants::BPS;

multiversx_sc::imports!();

/// Flash loan receiver used by the lending scenarios. Each endpoint sends the borrowed coin
/// back to the caller with a different repayment behaviour.
#[multiversx_sc::contract]
pub trait FlashMock {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    /// Repays the principal plus `fee_bps` basis points, paid from the mock's own balance.
    #[payable]
    #[endpoint(flash)]
    fn flash(&self, fee_bps: u64) {
        let (coin_type, amount) = self.call_value().egld_or_single_fungible_esdt();
        let fee = &amount * &BigUint::from(fee_bps) / &BigUint::from(BPS);

        self.send_back(&coin_type, &(amount + fee));
    }

    /// Repays one unit less than principal plus `fee_bps`.
    #[payable]
    #[endpoint(flashRepayShort)]
    fn flash_repay_short(&self, fee_bps: u64) {
        let (coin_type, amount) = self.call_value().egld_or_single_fungible_esdt();
        let fee = &amount * &BigUint::from(fee_bps) / &BigUint::from(BPS);

        self.send_back(&coin_type, &(amount + fee - BigUint::from(1u32)));
    }

    /// Keeps the loan.
    #[payable]
    #[endpoint(flashNoRepay)]
    fn flash_no_repay(&self) {}

    fn send_back(&self, coin_type: &EgldOrEsdtTokenIdentifier, amount: &BigUint) {
        let caller = self.blockchain().get_caller();
        self.tx()
            .to(&caller)
            .egld_or_single_esdt(coin_type, 0, amount)
            .transfer();
    }
}
