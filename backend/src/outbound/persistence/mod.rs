//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters implement the domain's driven ports over a shared [`DbPool`].
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! internal; only domain types cross the boundary.
//!
//! # Example
//!
//! ```no_run
//! use habits_backend::outbound::persistence::{DbPool, DieselCompletionLedger, PoolConfig};
//!
//! # async fn build() -> Result<(), habits_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/habits")).await?;
//! let ledger = DieselCompletionLedger::new(pool);
//! # let _ = ledger;
//! # Ok(())
//! # }
//! ```

mod diesel_badge_repository;
mod diesel_completion_ledger;
mod diesel_error_mapping;
mod diesel_habit_repository;
mod diesel_leaderboard_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_badge_repository::DieselBadgeRepository;
pub use diesel_completion_ledger::DieselCompletionLedger;
pub use diesel_habit_repository::DieselHabitRepository;
pub use diesel_leaderboard_repository::DieselLeaderboardRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
