//! Leaderboard domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{LeaderboardQuery, LeaderboardRepository, LeaderboardRepositoryError};
use crate::domain::{Error, Leaderboard, LeaderboardRequest, rank};

/// Ranks standings supplied by a [`LeaderboardRepository`].
#[derive(Clone)]
pub struct LeaderboardService<R> {
    repo: Arc<R>,
}

impl<R> LeaderboardService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_leaderboard_error(err: LeaderboardRepositoryError) -> Error {
    match err {
        LeaderboardRepositoryError::Connection { message } => {
            Error::internal(format!("leaderboard unavailable: {message}"))
        }
        LeaderboardRepositoryError::Query { message } => {
            Error::internal(format!("leaderboard error: {message}"))
        }
    }
}

#[async_trait]
impl<R> LeaderboardQuery for LeaderboardService<R>
where
    R: LeaderboardRepository,
{
    async fn leaderboard(&self, request: LeaderboardRequest) -> Result<Leaderboard, Error> {
        let standings = self
            .repo
            .standings(&request)
            .await
            .map_err(map_leaderboard_error)?;
        let entries = rank(standings, &request);
        Ok(Leaderboard { request, entries })
    }
}
