multiversx_sc::imports!();

use common_errors::{ERROR_INVALID_LEADERBOARD_STATUS, ERROR_INVALID_TIME_WINDOW};
use common_structs::{LeaderboardInfo, LeaderboardStatus};

/// Board lifecycle and scorer whitelist. Boards move `Pending -> Active -> Deactivated ->
/// Removed` only through these calls; the time window never changes a status by itself.
#[multiversx_sc::module]
pub trait ConfigModule:
    crate::storage::Storage + crate::ranking::RankingModule + common_events::EventsModule
{
    /// Registers a pending board under `key` and returns its id.
    #[only_owner]
    #[endpoint(createLeaderboard)]
    fn create_leaderboard(&self, key: ManagedBuffer, start_ts: u64, end_ts: u64) -> u64 {
        require!(start_ts < end_ts, ERROR_INVALID_TIME_WINDOW);

        let id = self.last_leaderboard_id().update(|last| {
            *last += 1;
            *last
        });
        let info = LeaderboardInfo {
            id,
            key: key.clone(),
            start_ts,
            end_ts,
            status: LeaderboardStatus::Pending,
        };

        self.leaderboard(id).set(&info);
        self.board_ids(&key).push_back(id);
        self.emit_status(&info);

        id
    }

    #[only_owner]
    #[endpoint(activateLeaderboard)]
    fn activate_leaderboard(&self, id: u64) {
        self.transition(id, |info| {
            require!(info.is_pending(), ERROR_INVALID_LEADERBOARD_STATUS);
            info.status = LeaderboardStatus::Active;
        });
    }

    /// Pushes the end of a pending or active board further out.
    #[only_owner]
    #[endpoint(extendLeaderboard)]
    fn extend_leaderboard(&self, id: u64, new_end_ts: u64) {
        self.transition(id, |info| {
            require!(
                info.is_pending() || info.is_active(),
                ERROR_INVALID_LEADERBOARD_STATUS
            );
            require!(new_end_ts > info.end_ts, ERROR_INVALID_TIME_WINDOW);
            info.end_ts = new_end_ts;
        });
    }

    #[only_owner]
    #[endpoint(deactivateLeaderboard)]
    fn deactivate_leaderboard(&self, id: u64) {
        self.transition(id, |info| {
            require!(info.is_active(), ERROR_INVALID_LEADERBOARD_STATUS);
            info.status = LeaderboardStatus::Deactivated;
        });
    }

    /// Drops every score and ranking entry of a deactivated board. The board record stays,
    /// marked `Removed`.
    #[only_owner]
    #[endpoint(removeLeaderboard)]
    fn remove_leaderboard(&self, id: u64) {
        let info = self.get_leaderboard(id);
        require!(info.is_deactivated(), ERROR_INVALID_LEADERBOARD_STATUS);

        self.drop_board_state(id);
        self.board_ids(&info.key).remove(&id);

        self.transition(id, |info| info.status = LeaderboardStatus::Removed);
    }

    #[only_owner]
    #[endpoint(addScorer)]
    fn add_scorer(&self, scorer: ManagedAddress) {
        self.scorers().insert(scorer);
    }

    #[only_owner]
    #[endpoint(removeScorer)]
    fn remove_scorer(&self, scorer: ManagedAddress) {
        self.scorers().swap_remove(&scorer);
    }

    fn transition<F: FnOnce(&mut LeaderboardInfo<Self::Api>)>(&self, id: u64, f: F) {
        self.get_leaderboard(id);
        let info = self.leaderboard(id).update(|info| {
            f(info);
            info.clone()
        });
        self.emit_status(&info);
    }

    fn emit_status(&self, info: &LeaderboardInfo<Self::Api>) {
        self.leaderboard_status_event(info.id, &info.key, info.start_ts, info.end_ts, &info.status);
    }
}
