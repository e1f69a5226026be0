use multiversx_sc::types::{TestAddress, TestSCAddress};
use multiversx_sc_scenario::imports::{MxscPath, TestTokenIdentifier};

pub const LENDING_PATH: MxscPath = MxscPath::new("output/lending.mxsc.json");
pub const FLASH_MOCK_PATH: MxscPath = MxscPath::new("../flash_mock/output/flash-mock.mxsc.json");

pub const OWNER_ADDRESS: TestAddress = TestAddress::new("owner");
pub const SUPPLIER_ADDRESS: TestAddress = TestAddress::new("supplier");
pub const BORROWER_ADDRESS: TestAddress = TestAddress::new("borrower");
pub const LIQUIDATOR_ADDRESS: TestAddress = TestAddress::new("liquidator");
pub const FEEDER_ADDRESS: TestAddress = TestAddress::new("feeder");

pub const LENDING_ADDRESS: TestSCAddress = TestSCAddress::new("lending");
pub const FLASH_MOCK_ADDRESS: TestSCAddress = TestSCAddress::new("flash-mock");

pub const EGLD_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("WEGLD-123456");
pub const EGLD_DECIMALS: u64 = 18;
pub const EGLD_ASSET_ID: u16 = 0;
pub const EGLD_ORACLE_ID: u16 = 0;

pub const USDC_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("USDC-123456");
pub const USDC_DECIMALS: u64 = 6;
pub const USDC_ASSET_ID: u16 = 1;
pub const USDC_ORACLE_ID: u16 = 1;

pub const UNKNOWN_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new("XOXNO-123456");

pub const START_TIMESTAMP: u64 = 1_000;
pub const SECONDS_PER_DAY: u64 = 86_400;

// RAY fractions
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const PERCENT: u128 = RAY / 100;

pub const LTV: u128 = 80 * PERCENT;
pub const LIQ_THRESHOLD: u128 = 85 * PERCENT;
pub const LIQ_RATIO: u128 = 50 * PERCENT;
pub const LIQ_BONUS: u128 = 5 * PERCENT;
pub const TREASURY_FACTOR: u128 = 10 * PERCENT;

pub const R_BASE: u128 = 0;
pub const R_SLOPE1: u128 = 20 * PERCENT;
pub const R_SLOPE2: u128 = 100 * PERCENT;
pub const RESERVE_FACTOR: u128 = 10 * PERCENT;
pub const U_OPTIMAL: u128 = 80 * PERCENT;

pub const FLASH_FEE_SUPPLIER: u64 = 30;
pub const FLASH_FEE_TREASURY: u64 = 20;
pub const FLASH_FEE_BPS: u64 = 50;

// 9-decimal raw units
pub const SUPPLY_CAP: u128 = 1_000_000_000 * 1_000_000_000;
