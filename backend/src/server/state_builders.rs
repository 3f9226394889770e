//! Builders wiring HTTP state to the configured store.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::warn;

use habits_backend::domain::{
    BadgeService, CompletionService, HabitService, LeaderboardService, UserService,
};
use habits_backend::inbound::http::state::HttpState;
use habits_backend::outbound::memory::InMemoryStore;
use habits_backend::outbound::persistence::{
    DbPool, DieselBadgeRepository, DieselCompletionLedger, DieselHabitRepository,
    DieselLeaderboardRepository, DieselUserRepository,
};

use super::ServerConfig;
use super::config::Storage;

fn build_diesel_state(pool: &DbPool) -> HttpState {
    let completions = Arc::new(CompletionService::new(Arc::new(DieselCompletionLedger::new(
        pool.clone(),
    ))));
    let habits = Arc::new(HabitService::new(Arc::new(DieselHabitRepository::new(
        pool.clone(),
    ))));
    let users = Arc::new(UserService::new(Arc::new(DieselUserRepository::new(
        pool.clone(),
    ))));
    let badges = Arc::new(BadgeService::new(Arc::new(DieselBadgeRepository::new(
        pool.clone(),
    ))));
    let leaderboard = Arc::new(LeaderboardService::new(Arc::new(
        DieselLeaderboardRepository::new(pool.clone()),
    )));

    HttpState {
        completions: completions.clone(),
        completions_query: completions,
        habits: habits.clone(),
        habits_query: habits,
        users: users.clone(),
        users_query: users,
        badges: badges.clone(),
        badges_query: badges,
        leaderboard,
    }
}

/// Build HTTP state from Diesel adapters when a pool is configured,
/// otherwise from an in-memory store seeded with the default badges.
///
/// # Errors
/// Returns [`std::io::Error`] if the default badge catalogue fails
/// validation.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match config.storage() {
        Storage::Postgres(pool) => Ok(build_diesel_state(pool)),
        Storage::InMemory => {
            warn!("no database configured; using the in-memory store");
            let store = InMemoryStore::with_default_badges(Arc::new(DefaultClock))
                .map_err(|err| std::io::Error::other(format!("default badges invalid: {err}")))?;
            Ok(HttpState::from_store(Arc::new(store)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn memory_fallback_serves_the_default_catalogue() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
        assert_eq!(config.storage().describe(), "in-memory");
        let state = build_http_state(&config).expect("state builds");

        let badges = state.badges_query.list_badges().await.expect("badges listed");
        let thresholds: Vec<u32> = badges.iter().map(|badge| badge.points_threshold).collect();
        assert_eq!(thresholds, [10, 100, 200, 500, 1000]);
    }
}
