#![no_std]
use common_constants::{RAY_PRECISION, SECONDS_PER_YEAR};
use common_structs::BorrowRateFactors;

multiversx_sc::imports!();

#[multiversx_sc::module]
pub trait InterestRates: common_math::SharedMathModule {
    /// Computes the per-second borrow rate from the reserve's jump-rate curve.
    ///
    /// **Formula**:
    /// - below the kink: `base_rate + u * multiplier`
    /// - above the kink: `base_rate + optimal * multiplier + (u - optimal) * jump_rate_multiplier`
    ///
    /// The annual result is divided by `SECONDS_PER_YEAR`.
    fn calc_borrow_rate(
        &self,
        utilization: &ManagedDecimal<Self::Api, NumDecimals>,
        factors: &BorrowRateFactors<Self::Api>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let annual_rate = if utilization < &factors.optimal_utilization {
            factors.base_rate.clone() + self.ray_mul(utilization, &factors.multiplier)
        } else {
            let kink_rate = self.ray_mul(&factors.optimal_utilization, &factors.multiplier);
            let excess_utilization = utilization.clone() - factors.optimal_utilization.clone();
            let jump_rate = self.ray_mul(&excess_utilization, &factors.jump_rate_multiplier);
            factors.base_rate.clone() + kink_rate + jump_rate
        };

        self.div_half_up(
            &annual_rate,
            &self.to_decimal(BigUint::from(SECONDS_PER_YEAR), 0),
            RAY_PRECISION,
        )
    }

    /// Suppliers earn the borrow rate on the utilized share, minus the reserve factor.
    fn calc_supply_rate(
        &self,
        utilization: &ManagedDecimal<Self::Api, NumDecimals>,
        borrow_rate: &ManagedDecimal<Self::Api, NumDecimals>,
        reserve_factor: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if utilization == &self.ray_zero() {
            return self.ray_zero();
        }

        self.ray_mul(
            &self.ray_mul(borrow_rate, utilization),
            &(self.ray() - reserve_factor.clone()),
        )
    }

    /// `1 + rate * elapsed`
    fn calculate_linear_interest(
        &self,
        rate: &ManagedDecimal<Self::Api, NumDecimals>,
        elapsed: u64,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let factor = self.ray_mul(rate, &self.to_decimal(BigUint::from(elapsed), 0));

        self.ray() + factor
    }

    /// Taylor expansion of `e^(rate * elapsed)` up to the fifth power.
    fn calculate_compounded_interest(
        &self,
        rate: &ManagedDecimal<Self::Api, NumDecimals>,
        elapsed: u64,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let ray = self.ray();

        if elapsed == 0 {
            return ray;
        }

        let x = self.ray_mul(rate, &self.to_decimal(BigUint::from(elapsed), 0));

        let x_sq = self.ray_mul(&x, &x);
        let x_cub = self.ray_mul(&x_sq, &x);
        let x_pow4 = self.ray_mul(&x_cub, &x);
        let x_pow5 = self.ray_mul(&x_pow4, &x);

        let term2 = self.ray_div(&x_sq, &self.to_decimal(BigUint::from(2u64), 0));
        let term3 = self.ray_div(&x_cub, &self.to_decimal(BigUint::from(6u64), 0));
        let term4 = self.ray_div(&x_pow4, &self.to_decimal(BigUint::from(24u64), 0));
        let term5 = self.ray_div(&x_pow5, &self.to_decimal(BigUint::from(120u64), 0));

        ray + x + term2 + term3 + term4 + term5
    }

    /// Grows `index` so that `amount` is spread over every unit of `total_scaled` supply.
    ///
    /// **Formula**: `index * (1 + amount / (total_scaled * index))`
    fn cumulate_index(
        &self,
        total_scaled: &ManagedDecimal<Self::Api, NumDecimals>,
        index: &ManagedDecimal<Self::Api, NumDecimals>,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let total_real = self.ray_mul(total_scaled, index);
        if total_real == self.ray_zero() {
            return index.clone();
        }

        let ratio = self.ray_div(amount, &total_real);
        self.ray_mul(index, &(self.ray() + ratio))
    }

    fn get_utilization(
        &self,
        borrowed: &ManagedDecimal<Self::Api, NumDecimals>,
        supplied: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        if supplied == &self.to_decimal(BigUint::zero(), supplied.scale()) {
            return self.ray_zero();
        }
        self.ray_div(borrowed, supplied)
    }

    fn scaled_to_original(
        &self,
        scaled_amount: &ManagedDecimal<Self::Api, NumDecimals>,
        index: &ManagedDecimal<Self::Api, NumDecimals>,
        decimals: usize,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        let original_amount = self.ray_mul(scaled_amount, index);
        self.rescale_half_up(&original_amount, decimals)
    }

    fn original_to_scaled(
        &self,
        amount: &ManagedDecimal<Self::Api, NumDecimals>,
        index: &ManagedDecimal<Self::Api, NumDecimals>,
    ) -> ManagedDecimal<Self::Api, NumDecimals> {
        self.ray_div(amount, index)
    }
}
