//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BadgeCommand, BadgeQuery, BadgeRepository, CompletionCommand, CompletionLedger,
    CompletionQuery, HabitCommand, HabitQuery, HabitRepository, LeaderboardQuery,
    LeaderboardRepository, UserCommand, UserQuery, UserRepository,
};
use crate::domain::{
    BadgeService, CompletionService, HabitService, LeaderboardService, UserService,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use habits_backend::domain::{
///     BadgeService, CompletionService, HabitService, LeaderboardService, UserService,
/// };
/// use habits_backend::inbound::http::state::HttpState;
/// use habits_backend::outbound::memory::InMemoryStore;
/// use mockable::DefaultClock;
///
/// let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
/// let state = HttpState {
///     completions: Arc::new(CompletionService::new(store.clone())),
///     completions_query: Arc::new(CompletionService::new(store.clone())),
///     habits: Arc::new(HabitService::new(store.clone())),
///     habits_query: Arc::new(HabitService::new(store.clone())),
///     users: Arc::new(UserService::new(store.clone())),
///     users_query: Arc::new(UserService::new(store.clone())),
///     badges: Arc::new(BadgeService::new(store.clone())),
///     badges_query: Arc::new(BadgeService::new(store.clone())),
///     leaderboard: Arc::new(LeaderboardService::new(store)),
/// };
/// let _users = state.users_query.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub completions: Arc<dyn CompletionCommand>,
    pub completions_query: Arc<dyn CompletionQuery>,
    pub habits: Arc<dyn HabitCommand>,
    pub habits_query: Arc<dyn HabitQuery>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub badges: Arc<dyn BadgeCommand>,
    pub badges_query: Arc<dyn BadgeQuery>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
}

impl HttpState {
    /// Wire every service over one store implementing all driven ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use habits_backend::inbound::http::state::HttpState;
    /// use habits_backend::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = InMemoryStore::with_default_badges(Arc::new(DefaultClock))
    ///     .expect("default badges are valid");
    /// let _state = HttpState::from_store(Arc::new(store));
    /// ```
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CompletionLedger
            + HabitRepository
            + UserRepository
            + BadgeRepository
            + LeaderboardRepository
            + 'static,
    {
        let completions = Arc::new(CompletionService::new(store.clone()));
        let habits = Arc::new(HabitService::new(store.clone()));
        let users = Arc::new(UserService::new(store.clone()));
        let badges = Arc::new(BadgeService::new(store.clone()));
        Self {
            completions: completions.clone(),
            completions_query: completions,
            habits: habits.clone(),
            habits_query: habits,
            users: users.clone(),
            users_query: users,
            badges: badges.clone(),
            badges_query: badges,
            leaderboard: Arc::new(LeaderboardService::new(store)),
        }
    }
}
