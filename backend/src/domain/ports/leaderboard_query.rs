//! Driving port for the leaderboard.

use async_trait::async_trait;

use crate::domain::{Error, Leaderboard, LeaderboardRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Ranked standings for the effective filters in `request`.
    async fn leaderboard(&self, request: LeaderboardRequest) -> Result<Leaderboard, Error>;
}
