#![no_std]

// Amounts and caps
pub static ERROR_INVALID_AMOUNT: &[u8] = b"Invalid amount.";

pub static ERROR_AMOUNT_MUST_BE_GREATER_THAN_ZERO: &[u8] = b"Amount must be greater than zero.";

pub static ERROR_SUPPLY_CAP: &[u8] = b"Supply cap reached.";

pub static ERROR_BORROW_CAP: &[u8] = b"Borrow cap reached.";

pub static ERROR_FLASH_LOAN_AMOUNT_OUT_OF_BOUNDS: &[u8] =
    b"Flash loan amount is outside the configured bounds.";

pub static ERROR_INVALID_FLASHLOAN_REPAYMENT: &[u8] = b"Invalid flash loan repayment.";

// Assets
pub static ERROR_INVALID_COIN_TYPE: &[u8] = b"Invalid coin type.";

pub static ERROR_NO_LOAN_IN_ASSET: &[u8] = b"User has no loan in this asset.";

pub static ERROR_NO_COLLATERAL_IN_ASSET: &[u8] = b"User has no collateral in this asset.";

pub static ERROR_RESERVE_NOT_FOUND: &[u8] = b"Reserve not found.";

pub static ERROR_POOL_MISMATCH: &[u8] = b"Pool mismatch.";

pub static ERROR_FLASH_LOAN_NOT_CONFIGURED: &[u8] = b"Flash loan not configured for this asset.";

pub static ERROR_DUPLICATE_CONFIG: &[u8] = b"Duplicate config.";

// Balances
pub static ERROR_INSUFFICIENT_BALANCE: &[u8] = b"Insufficient balance.";

pub static ERROR_INSUFFICIENT_LIQUIDITY: &[u8] = b"Insufficient liquidity.";

// Health
pub static ERROR_USER_UNHEALTHY: &[u8] = b"User is unhealthy.";

pub static ERROR_USER_HEALTHY: &[u8] = b"Health not low enough for liquidation.";

pub static ERROR_INSUFFICIENT_COLLATERAL: &[u8] = b"Not enough collateral available for this loan.";

// Protocol gates
pub static ERROR_INCORRECT_VERSION: &[u8] = b"Incorrect version.";

pub static ERROR_NOT_UPGRADED: &[u8] = b"Version is already up to date.";

pub static ERROR_PAUSED: &[u8] = b"Contract is paused.";

pub static ERROR_FLASHLOAN_ONGOING: &[u8] = b"Flash loan already ongoing.";

// Risk configuration
pub static ERROR_INVALID_LTV: &[u8] = b"Loan to value must be lower than the liquidation threshold.";

pub static ERROR_INVALID_RATIO: &[u8] = b"Ratio must not exceed one.";

pub static ERROR_INVALID_OPTIMAL_UTILIZATION: &[u8] =
    b"Optimal utilization must be greater than zero and lower than one.";

pub static ERROR_INVALID_DECIMALS: &[u8] = b"Invalid token decimals.";

// Oracle
pub static ERROR_PRICE_FEED_NOT_FOUND: &[u8] = b"Price feed not found.";

pub static ERROR_PRICE_FEED_STALE: &[u8] = b"Price feed is stale.";

pub static ERROR_INVALID_PRICE: &[u8] = b"Price must be greater than zero.";

pub static ERROR_NOT_PRICE_FEEDER: &[u8] = b"Caller is not a price feeder.";

// Math
pub static ERROR_DIVISION_BY_ZERO: &[u8] = b"Division by zero.";

// Crit-bit tree
pub static ERROR_DUPLICATE_KEY: &[u8] = b"Key already exists.";

pub static ERROR_CAPACITY_EXCEEDED: &[u8] = b"Tree capacity exceeded.";

pub static ERROR_LEAF_NOT_FOUND: &[u8] = b"Leaf does not exist.";

// Linked set
pub static ERROR_SET_NOT_EMPTY: &[u8] = b"Linked set is not empty.";

// Leaderboard
pub static ERROR_LEADERBOARD_NOT_FOUND: &[u8] = b"Leaderboard not found.";

pub static ERROR_LEADERBOARD_KEY_MISMATCH: &[u8] = b"Leaderboard key mismatch.";

pub static ERROR_INVALID_LEADERBOARD_STATUS: &[u8] =
    b"Operation not allowed in the current leaderboard status.";

pub static ERROR_INVALID_TIME_WINDOW: &[u8] = b"Start time must be before end time.";

pub static ERROR_INSUFFICIENT_SCORE: &[u8] = b"Insufficient score.";

pub static ERROR_NOT_SCORER: &[u8] = b"Caller is not allowed to score.";

pub static ERROR_INVALID_SHARD: &[u8] = b"Invalid shard.";

pub static ERROR_INVALID_FLASHLOAN_RECEIVER: &[u8] = b"Flash loan receiver must be a smart contract.";
