//! `LeaderboardRepository` over the in-memory store.

use async_trait::async_trait;

use crate::domain::ports::{LeaderboardRepository, LeaderboardRepositoryError};
use crate::domain::{LeaderboardRequest, LeaderboardStanding, compare_standings};

use super::InMemoryStore;

#[async_trait]
impl LeaderboardRepository for InMemoryStore {
    async fn standings(
        &self,
        request: &LeaderboardRequest,
    ) -> Result<Vec<LeaderboardStanding>, LeaderboardRepositoryError> {
        self.read(|state| {
            let mut standings: Vec<LeaderboardStanding> = state
                .users
                .values()
                .filter(|user| request.matches(user.username.as_ref()))
                .map(|user| LeaderboardStanding {
                    user_id: user.id,
                    username: user.username.to_string(),
                    points: user.total_points,
                    completions_count: state
                        .completions
                        .values()
                        .filter(|completion| completion.user_id == user.id)
                        .count() as u64,
                    badges: state.awards_for(user.id),
                })
                .collect();
            standings.sort_by(|left, right| compare_standings(request, left, right));
            standings.truncate(request.limit() as usize);
            Ok(standings)
        })
    }
}
