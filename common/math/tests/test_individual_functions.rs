// Standalone tests for the individual math helpers
// Run with: cargo test --test test_individual_functions test_name

use multiversx_sc::types::{BigUint, ManagedDecimal};
use multiversx_sc_scenario::api::StaticApi;

use common_math::SharedMathModule;

pub struct MathTester;

impl multiversx_sc::contract_base::ContractBase for MathTester {
    type Api = StaticApi;
}

impl SharedMathModule for MathTester {}

#[test]
fn test_to_decimal_wad() {
    let tester = MathTester;

    let value = BigUint::<StaticApi>::from(1_000_000_000_000_000_000u64);
    let result = tester.to_decimal_wad(value.clone());

    assert_eq!(result.into_raw_units(), &value);
    assert_eq!(result.scale(), 18);
}

#[test]
fn test_zero_constants_keep_their_scale() {
    let tester = MathTester;

    assert_eq!(tester.ray_zero().scale(), 27);
    assert_eq!(tester.wad_zero().scale(), 18);
    assert_eq!(tester.ray_zero().into_raw_units(), &BigUint::<StaticApi>::zero());
}

#[test]
fn test_mul_half_up() {
    let tester = MathTester;

    // 1.5 * 2.0 = 3.0
    let a = ManagedDecimal::<StaticApi, usize>::from_raw_units(
        BigUint::from(1_500_000_000_000_000_000u64),
        18,
    );
    let b = ManagedDecimal::<StaticApi, usize>::from_raw_units(
        BigUint::from(2_000_000_000_000_000_000u64),
        18,
    );

    let result = tester.mul_half_up(&a, &b, 18);

    assert_eq!(
        result.into_raw_units(),
        &BigUint::<StaticApi>::from(3_000_000_000_000_000_000u64)
    );
}

#[test]
fn test_mul_half_up_rounding() {
    let tester = MathTester;

    // 1.5 * 1.3 = 1.95 rounds to 2.0
    let a = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(15u64), 1);
    let b = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(13u64), 1);

    let result = tester.mul_half_up(&a, &b, 1);

    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(20u64));
}

#[test]
fn test_div_half_up_rounding() {
    let tester = MathTester;

    // 5.0 / 3.0 = 1.666... rounds to 1.7
    let a = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(50u64), 1);
    let b = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(30u64), 1);

    let result = tester.div_half_up(&a, &b, 1);

    assert_eq!(result.into_raw_units(), &BigUint::<StaticApi>::from(17u64));
}

#[test]
#[should_panic]
fn test_div_half_up_by_zero_fails() {
    let tester = MathTester;

    let a = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(50u64), 1);
    let zero = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::zero(), 1);

    let _ = tester.div_half_up(&a, &zero, 1);
}

#[test]
fn test_rescale_half_up() {
    let tester = MathTester;

    let value = ManagedDecimal::<StaticApi, usize>::from_raw_units(
        BigUint::from(1_234_567_890_123_456_789u64),
        18,
    );
    let result = tester.rescale_half_up(&value, 4);
    let expected = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(12346u64), 4);

    assert_eq!(result.scale(), 4);
    assert_eq!(result, expected);
}

#[test]
fn test_get_min() {
    let tester = MathTester;

    let a = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(100u64), 2);
    let b = ManagedDecimal::<StaticApi, usize>::from_raw_units(BigUint::from(200u64), 2);

    let result = tester.get_min(a.clone(), b);
    assert_eq!(result.into_raw_units(), a.into_raw_units());
}
