multiversx_sc::imports!();

use common_errors::ERROR_LEADERBOARD_KEY_MISMATCH;
use common_structs::{LeaderboardInfo, RankingPage};

#[multiversx_sc::module]
pub trait ViewsModule:
    crate::storage::Storage + crate::ranking::RankingModule + common_events::EventsModule
{
    #[view(getLeaderboard)]
    fn get_leaderboard_view(&self, id: u64) -> LeaderboardInfo<Self::Api> {
        self.get_leaderboard(id)
    }

    #[view(getLeaderboardIds)]
    fn get_leaderboard_ids(&self, key: ManagedBuffer) -> MultiValueEncoded<u64> {
        let mut ids = MultiValueEncoded::new();
        for id in self.board_ids(&key).iter() {
            ids.push(id);
        }
        ids
    }

    #[view(getUserScore)]
    fn get_user_score(&self, id: u64, user: ManagedAddress) -> u64 {
        self.get_leaderboard(id);
        self.user_score(id, &user).get()
    }

    /// `user`'s own score, then up to `limit` users from the top: one page per score,
    /// ties in the order they reached it.
    #[view(getRankings)]
    fn get_rankings(
        &self,
        key: ManagedBuffer,
        id: u64,
        limit: usize,
        user: ManagedAddress,
    ) -> MultiValue2<u64, ManagedVec<RankingPage<Self::Api>>> {
        let info = self.get_leaderboard(id);
        require!(info.key == key, ERROR_LEADERBOARD_KEY_MISMATCH);

        let user_score = self.user_score(id, &user).get();
        (user_score, self.top_pages(id, limit)).into()
    }
}
