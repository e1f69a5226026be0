multiversx_sc::imports!();

use common_errors::ERROR_LEADERBOARD_NOT_FOUND;
use common_structs::LeaderboardInfo;

use crate::{critbit::CritbitTree, linked_set::LinkedSet};

#[multiversx_sc::module]
pub trait Storage {
    #[view(getLastLeaderboardId)]
    #[storage_mapper("last_leaderboard_id")]
    fn last_leaderboard_id(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("leaderboard")]
    fn leaderboard(&self, id: u64) -> SingleValueMapper<LeaderboardInfo<Self::Api>>;

    /// Boards registered under `key`, in creation order.
    #[storage_mapper("board_ids")]
    fn board_ids(&self, key: &ManagedBuffer) -> LinkedSet<Self::Api, u64>;

    #[storage_mapper("user_score")]
    fn user_score(&self, id: u64, user: &ManagedAddress) -> SingleValueMapper<u64>;

    /// Score to tie group id. Every leaf owns exactly one non-empty `tie_group`.
    #[storage_mapper("ranking")]
    fn ranking(&self, id: u64) -> CritbitTree<Self::Api, u64>;

    #[storage_mapper("tie_group")]
    fn tie_group(&self, id: u64, group: u64) -> LinkedSet<Self::Api, ManagedAddress>;

    #[storage_mapper("last_group_id")]
    fn last_group_id(&self, id: u64) -> SingleValueMapper<u64>;

    #[view(getScorers)]
    #[storage_mapper("scorers")]
    fn scorers(&self) -> UnorderedSetMapper<ManagedAddress>;

    fn get_leaderboard(&self, id: u64) -> LeaderboardInfo<Self::Api> {
        let mapper = self.leaderboard(id);
        require!(!mapper.is_empty(), ERROR_LEADERBOARD_NOT_FOUND);
        mapper.get()
    }
}
