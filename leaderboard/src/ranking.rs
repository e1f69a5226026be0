multiversx_sc::imports!();

use common_errors::{ERROR_INSUFFICIENT_SCORE, ERROR_INVALID_AMOUNT, ERROR_LEAF_NOT_FOUND};
use common_structs::RankingPage;
use multiversx_sc::storage::mappers::StorageClearable;

use crate::critbit::NONE;

/// Keeps `user_score`, the critbit ranking and the tie groups consistent: a user with a
/// recorded score sits in exactly one tie group, the one stored at the leaf of that score.
#[multiversx_sc::module]
pub trait RankingModule: crate::storage::Storage + common_events::EventsModule {
    /// First board under `key`, in creation order, that is active and whose window holds `now`.
    fn find_live_board(&self, key: &ManagedBuffer, now: u64) -> Option<u64> {
        self.board_ids(key)
            .iter()
            .find(|id| self.leaderboard(*id).get().is_live_at(now))
    }

    /// Adds `delta` to `user`'s score on the live board for `key`. Returns the applied delta,
    /// zero when nothing matched.
    fn apply_score(&self, key: &ManagedBuffer, user: &ManagedAddress, delta: u64, now: u64) -> u64 {
        if delta == 0 {
            return 0;
        }
        let Some(id) = self.find_live_board(key, now) else {
            return 0;
        };

        let score_mapper = self.user_score(id, user);
        let new_score = if score_mapper.is_empty() {
            delta
        } else {
            let old_score = score_mapper.get();
            self.leave_group(id, old_score, user);
            match old_score.checked_add(delta) {
                Some(score) => score,
                None => sc_panic!(ERROR_INVALID_AMOUNT),
            }
        };

        self.join_group(id, new_score, user);
        score_mapper.set(new_score);
        self.leaderboard_score_event(id, user, delta, false, new_score);

        delta
    }

    /// Subtracts `delta` from `user`'s score on the live board for `key`. A score that reaches
    /// zero takes the user out of the ranking.
    fn apply_deduct(&self, key: &ManagedBuffer, user: &ManagedAddress, delta: u64, now: u64) -> u64 {
        if delta == 0 {
            return 0;
        }
        let Some(id) = self.find_live_board(key, now) else {
            return 0;
        };

        let score_mapper = self.user_score(id, user);
        if score_mapper.is_empty() {
            return 0;
        }

        let old_score = score_mapper.get();
        require!(delta <= old_score, ERROR_INSUFFICIENT_SCORE);

        let new_score = old_score - delta;
        self.leave_group(id, old_score, user);
        if new_score == 0 {
            score_mapper.clear();
        } else {
            self.join_group(id, new_score, user);
            score_mapper.set(new_score);
        }
        self.leaderboard_score_event(id, user, delta, true, new_score);

        delta
    }

    fn leave_group(&self, id: u64, score: u64, user: &ManagedAddress) {
        let mut ranking = self.ranking(id);
        let leaf = match ranking.find(score) {
            Some(leaf) => leaf,
            None => sc_panic!(ERROR_LEAF_NOT_FOUND),
        };

        let group = ranking.borrow(leaf);
        let mut members = self.tie_group(id, group);
        members.remove(user);

        if members.is_empty() {
            members.destroy_empty();
            ranking.remove_by_index(leaf);
        }
    }

    fn join_group(&self, id: u64, score: u64, user: &ManagedAddress) {
        let mut ranking = self.ranking(id);
        let group = match ranking.find(score) {
            Some(leaf) => ranking.borrow(leaf),
            None => {
                let group = self.last_group_id(id).update(|last| {
                    *last += 1;
                    *last
                });
                ranking.insert(score, group);
                group
            },
        };

        self.tie_group(id, group).push_back(user.clone());
    }

    /// Up to `limit` users from the top score down, one page per distinct score.
    fn top_pages(&self, id: u64, limit: usize) -> ManagedVec<RankingPage<Self::Api>> {
        let ranking = self.ranking(id);
        let mut pages = ManagedVec::new();
        let mut emitted = 0usize;
        let (mut score, mut leaf) = ranking.max();

        while leaf != NONE && emitted < limit {
            let group = ranking.borrow(leaf);
            let mut users = ManagedVec::new();
            for user in self.tie_group(id, group).iter() {
                if emitted == limit {
                    break;
                }
                users.push(user);
                emitted += 1;
            }
            pages.push(RankingPage { score, users });

            (score, leaf) = ranking.previous(score);
        }

        pages
    }

    /// Clears every score, tie group and ranking leaf of board `id`.
    fn drop_board_state(&self, id: u64) {
        let mut ranking = self.ranking(id);

        while !ranking.is_empty() {
            let (_, leaf) = ranking.max();
            let group = ranking.remove_by_index(leaf);

            let members = self.tie_group(id, group);
            for user in members.iter() {
                self.user_score(id, &user).clear();
            }
            members.drop_remaining();
        }

        ranking.clear();
        self.last_group_id(id).clear();
    }
}
