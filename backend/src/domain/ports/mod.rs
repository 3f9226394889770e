//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`CompletionLedger`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod badge_command;
mod badge_query;
mod badge_repository;
mod completion_command;
mod completion_ledger;
mod completion_query;
mod habit_command;
mod habit_query;
mod habit_repository;
mod leaderboard_query;
mod leaderboard_repository;
mod user_command;
mod user_query;
mod user_repository;

pub use badge_command::BadgeCommand;
#[cfg(test)]
pub use badge_command::MockBadgeCommand;
pub use badge_query::BadgeQuery;
#[cfg(test)]
pub use badge_query::MockBadgeQuery;
#[cfg(test)]
pub use badge_repository::MockBadgeRepository;
pub use badge_repository::{BadgeRepository, BadgeRepositoryError};
pub use completion_command::CompletionCommand;
#[cfg(test)]
pub use completion_command::MockCompletionCommand;
#[cfg(test)]
pub use completion_ledger::MockCompletionLedger;
pub use completion_ledger::{CompletionLedger, CompletionLedgerError};
pub use completion_query::CompletionQuery;
#[cfg(test)]
pub use completion_query::MockCompletionQuery;
pub use habit_command::HabitCommand;
#[cfg(test)]
pub use habit_command::MockHabitCommand;
pub use habit_query::HabitQuery;
#[cfg(test)]
pub use habit_query::MockHabitQuery;
#[cfg(test)]
pub use habit_repository::MockHabitRepository;
pub use habit_repository::{HabitRepository, HabitRepositoryError};
pub use leaderboard_query::LeaderboardQuery;
#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
#[cfg(test)]
pub use leaderboard_repository::MockLeaderboardRepository;
pub use leaderboard_repository::{LeaderboardRepository, LeaderboardRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
