#![no_std]

pub const SECONDS_PER_YEAR: u64 = 31_536_000;

pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const RAY_PRECISION: usize = 27;

/// Unit of account for oracle prices and position values (1 USD)
pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const WAD_PRECISION: usize = 18;

pub const BPS: usize = 10_000; // 100%

/// Every ledger amount is rebased to this many decimals, whatever the token's native decimals
pub const NORMAL_DECIMALS: usize = 9;

/// Collateral left behind by a withdrawal at or below this many normalized units is swept to the treasury
pub const DUST_THRESHOLD: u64 = 1_000;

/// Denominator of the flash loan fee rates (`rate / FLASH_LOAN_FEE_MULTIPLE`)
pub const FLASH_LOAN_FEE_MULTIPLE: u64 = 10_000;

/// Storage schema version this code expects, checked on every mutating endpoint
pub const PROTOCOL_VERSION: u64 = 1;

/// Default staleness window for oracle prices
pub const DEFAULT_MAX_PRICE_AGE_SECONDS: u64 = 300;
