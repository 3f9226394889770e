//! Port for leaderboard aggregates.

use async_trait::async_trait;

use crate::domain::{LeaderboardRequest, LeaderboardStanding};

use super::define_port_error;

define_port_error! {
    /// Errors raised by leaderboard adapters.
    pub enum LeaderboardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "leaderboard connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "leaderboard query failed: {message}",
    }
}

/// Source of per-user standings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// The first `request.limit()` standings among users whose name matches
    /// the search term, under [`crate::domain::compare_standings`]. The
    /// returned order is not significant.
    async fn standings(
        &self,
        request: &LeaderboardRequest,
    ) -> Result<Vec<LeaderboardStanding>, LeaderboardRepositoryError>;
}
