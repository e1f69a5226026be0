#![no_std]

multiversx_sc::imports!();

pub mod config;
pub mod critbit;
pub mod linked_set;
pub mod ranking;
pub mod storage;
pub mod views;

pub use common_errors::*;
pub use common_structs::{LeaderboardInfo, LeaderboardStatus, RankingPage};

/// Score-sorted rankings for named competitions.
///
/// Whitelisted scorers push score changes under a competition key; the first active board for
/// that key whose window holds the current block receives them.
#[multiversx_sc::contract]
pub trait Leaderboard:
    storage::Storage
    + ranking::RankingModule
    + config::ConfigModule
    + views::ViewsModule
    + common_events::EventsModule
    + multiversx_sc_modules::pause::PauseModule
{
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    /// Adds `delta` to `user`'s score. Returns the applied delta, zero when no board is live.
    #[endpoint(score)]
    fn score(&self, key: ManagedBuffer, user: ManagedAddress, delta: u64) -> u64 {
        self.require_scorer();
        let now = self.blockchain().get_block_timestamp();
        self.apply_score(&key, &user, delta, now)
    }

    /// Removes `delta` from `user`'s score. Unknown users and idle keys are a no-op.
    #[endpoint(deduct)]
    fn deduct(&self, key: ManagedBuffer, user: ManagedAddress, delta: u64) -> u64 {
        self.require_scorer();
        let now = self.blockchain().get_block_timestamp();
        self.apply_deduct(&key, &user, delta, now)
    }

    fn require_scorer(&self) {
        require!(self.not_paused(), ERROR_PAUSED);
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.blockchain().get_owner_address() || self.scorers().contains(&caller),
            ERROR_NOT_SCORER
        );
    }
}
