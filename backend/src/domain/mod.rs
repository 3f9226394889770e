//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the habit tracker's entities, the badge evaluator, the
//! port traits at the hexagon's edge, and the services implementing the
//! driving ports. Nothing here depends on HTTP or a particular database.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - Typed identifiers ([`UserId`], [`HabitId`], [`CompletionId`], [`BadgeId`]).
//! - [`newly_earned_badges`]: the pure badge evaluator.
//! - [`rank`]: leaderboard ordering shared by every store.
//! - Services: [`CompletionService`], [`HabitService`], [`UserService`],
//!   [`BadgeService`], [`LeaderboardService`].

pub mod badge;
mod badge_service;
pub mod completion;
mod completion_service;
pub mod error;
pub mod habit;
mod habit_service;
pub mod ids;
pub mod leaderboard;
mod leaderboard_service;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::badge::{
    Badge, BadgeAward, BadgeName, BadgeUpdate, BadgeValidationError, DEFAULT_BADGES, NewBadge,
    newly_earned_badges,
};
pub use self::badge_service::BadgeService;
pub use self::completion::{
    Completion, CompletionEntry, CompletionFilter, RecordedCompletion, RevertedCompletion,
};
pub use self::completion_service::CompletionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::habit::{
    Habit, HabitListing, HabitName, HabitOverview, HabitRetirement, HabitUpdate,
    HabitValidationError, NewHabit,
};
pub use self::habit_service::HabitService;
pub use self::ids::{BadgeId, CompletionId, HabitId, IdValidationError, UserId};
pub use self::leaderboard::{
    Leaderboard, LeaderboardEntry, LeaderboardOrder, LeaderboardRequest, LeaderboardStanding,
    SortDirection, compare_standings, rank,
};
pub use self::leaderboard_service::LeaderboardService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, User, UserProfile, UserUpdate, UserValidationError, Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use habits_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("habit not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
