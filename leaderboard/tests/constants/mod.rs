use multiversx_sc::types::{TestAddress, TestSCAddress};
use multiversx_sc_scenario::imports::MxscPath;

pub const LEADERBOARD_PATH: MxscPath = MxscPath::new("output/leaderboard.mxsc.json");

pub const OWNER_ADDRESS: TestAddress = TestAddress::new("owner");
pub const SCORER_ADDRESS: TestAddress = TestAddress::new("scorer");
pub const ALICE_ADDRESS: TestAddress = TestAddress::new("alice");
pub const BOB_ADDRESS: TestAddress = TestAddress::new("bob");
pub const CAROL_ADDRESS: TestAddress = TestAddress::new("carol");
pub const DAVE_ADDRESS: TestAddress = TestAddress::new("dave");

pub const LEADERBOARD_ADDRESS: TestSCAddress = TestSCAddress::new("leaderboard");

pub const SEASON_KEY: &[u8] = b"season";
pub const OTHER_KEY: &[u8] = b"tournament";

pub const START_TIMESTAMP: u64 = 1_000;
pub const WINDOW_START: u64 = 1_000;
pub const WINDOW_END: u64 = 2_000;
