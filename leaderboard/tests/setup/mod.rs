use crate::constants::*;

use leaderboard::{config::ConfigModule, views::ViewsModule, Leaderboard, LeaderboardInfo};
use multiversx_sc::types::{Address, ManagedBuffer, TestAddress};
use multiversx_sc_scenario::{imports::ExpectMessage, DebugApi, ScenarioTxWhitebox, ScenarioWorld};

pub fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();

    blockchain.register_contract(LEADERBOARD_PATH, leaderboard::ContractBuilder);

    blockchain
}

pub fn error_text(error: &[u8]) -> &str {
    core::str::from_utf8(error).unwrap()
}

/// `(score, users)` per page, as returned by `getRankings`.
pub type Pages = Vec<(u64, Vec<Address>)>;

pub struct LeaderboardTestState {
    pub world: ScenarioWorld,
}

impl LeaderboardTestState {
    /// Deploys the contract and whitelists `SCORER_ADDRESS`.
    pub fn new() -> Self {
        let mut world = world();
        world.current_block().block_timestamp(START_TIMESTAMP);

        for account in [
            OWNER_ADDRESS,
            SCORER_ADDRESS,
            ALICE_ADDRESS,
            BOB_ADDRESS,
            CAROL_ADDRESS,
            DAVE_ADDRESS,
        ] {
            world.account(account).nonce(1);
        }

        world
            .tx()
            .from(OWNER_ADDRESS)
            .raw_deploy()
            .code(LEADERBOARD_PATH)
            .new_address(LEADERBOARD_ADDRESS)
            .whitebox(leaderboard::contract_obj, |sc| {
                sc.init();
            });

        let mut state = Self { world };
        state.owner(|sc| sc.add_scorer(SCORER_ADDRESS.to_managed_address()));

        state
    }

    pub fn owner<F>(&mut self, f: F)
    where
        F: FnOnce(leaderboard::ContractObj<DebugApi>),
    {
        self.call_as(OWNER_ADDRESS, f);
    }

    pub fn owner_error<F>(&mut self, error: &[u8], f: F)
    where
        F: FnOnce(leaderboard::ContractObj<DebugApi>),
    {
        self.call_as_error(OWNER_ADDRESS, error, f);
    }

    pub fn call_as<F>(&mut self, from: TestAddress, f: F)
    where
        F: FnOnce(leaderboard::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(from)
            .to(LEADERBOARD_ADDRESS)
            .whitebox(leaderboard::contract_obj, f);
    }

    pub fn call_as_error<F>(&mut self, from: TestAddress, error: &[u8], f: F)
    where
        F: FnOnce(leaderboard::ContractObj<DebugApi>),
    {
        self.world
            .tx()
            .from(from)
            .to(LEADERBOARD_ADDRESS)
            .returns(ExpectMessage(error_text(error)))
            .whitebox(leaderboard::contract_obj, f);
    }

    pub fn query<F>(&mut self, f: F)
    where
        F: FnOnce(leaderboard::ContractObj<DebugApi>),
    {
        self.world
            .query()
            .to(LEADERBOARD_ADDRESS)
            .whitebox(leaderboard::contract_obj, f);
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.world.current_block().block_timestamp(timestamp);
    }

    pub fn create(&mut self, key: &[u8], start_ts: u64, end_ts: u64) -> u64 {
        let mut id = 0;
        self.owner(|sc| {
            id = sc.create_leaderboard(ManagedBuffer::from(key), start_ts, end_ts);
        });
        id
    }

    /// Creates and activates a board over the default window.
    pub fn create_active(&mut self, key: &[u8]) -> u64 {
        let id = self.create(key, WINDOW_START, WINDOW_END);
        self.owner(|sc| sc.activate_leaderboard(id));
        id
    }

    pub fn score(&mut self, key: &[u8], user: TestAddress, delta: u64) -> u64 {
        let mut applied = 0;
        self.call_as(SCORER_ADDRESS, |sc| {
            applied = sc.score(ManagedBuffer::from(key), user.to_managed_address(), delta);
        });
        applied
    }

    pub fn deduct(&mut self, key: &[u8], user: TestAddress, delta: u64) -> u64 {
        let mut applied = 0;
        self.call_as(SCORER_ADDRESS, |sc| {
            applied = sc.deduct(ManagedBuffer::from(key), user.to_managed_address(), delta);
        });
        applied
    }

    pub fn deduct_error(&mut self, key: &[u8], user: TestAddress, delta: u64, error: &[u8]) {
        self.call_as_error(SCORER_ADDRESS, error, |sc| {
            sc.deduct(ManagedBuffer::from(key), user.to_managed_address(), delta);
        });
    }

    pub fn user_score(&mut self, id: u64, user: TestAddress) -> u64 {
        let mut score = 0;
        self.query(|sc| {
            score = sc.get_user_score(id, user.to_managed_address());
        });
        score
    }

    /// `(own score of user, pages)` from `getRankings`.
    pub fn rankings(&mut self, key: &[u8], id: u64, limit: usize, user: TestAddress) -> (u64, Pages) {
        let mut result: (u64, Pages) = (0, Vec::new());
        self.query(|sc| {
            let (own_score, pages) = sc
                .get_rankings(ManagedBuffer::from(key), id, limit, user.to_managed_address())
                .into_tuple();

            let pages: Pages = pages
                .iter()
                .map(|page| {
                    let users = page.users.iter().map(|user| user.to_address()).collect();
                    (page.score, users)
                })
                .collect();
            result = (own_score, pages);
        });
        result
    }

    pub fn leaderboard<F>(&mut self, id: u64, f: F)
    where
        F: FnOnce(LeaderboardInfo<DebugApi>),
    {
        self.query(|sc| f(sc.get_leaderboard_view(id)));
    }
}

pub fn page(score: u64, users: &[TestAddress]) -> (u64, Vec<Address>) {
    (score, users.iter().map(|user| user.to_address()).collect())
}
