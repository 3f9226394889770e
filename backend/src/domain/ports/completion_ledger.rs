//! Driven port for the completion award transaction.
//!
//! A [`CompletionLedger`] owns the unit of work that records a completion,
//! credits the user, and grants badges, plus the symmetric rollback. Each
//! call is atomic: on any error no row from the call remains visible.

use async_trait::async_trait;

use crate::domain::{
    CompletionEntry, CompletionFilter, CompletionId, HabitId, RecordedCompletion,
    RevertedCompletion, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by completion ledger adapters.
    pub enum CompletionLedgerError {
        /// The referenced habit does not exist.
        HabitNotFound { habit_id: HabitId } => "habit {habit_id} not found",
        /// The referenced user does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
        /// The referenced completion does not exist.
        CompletionNotFound { completion_id: CompletionId } =>
            "completion {completion_id} not found",
        /// Ledger connection could not be established.
        Connection { message: String } =>
            "completion ledger connection failed: {message}",
        /// A step of the unit of work failed and the transaction rolled back.
        Query { message: String } =>
            "completion ledger query failed: {message}",
    }
}

/// Transactional store for completions, point totals, and badge awards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionLedger: Send + Sync {
    /// Record a completion of `habit_id` by `user_id`.
    ///
    /// Within one transaction the adapter snapshots the habit's points,
    /// inserts the completion, increments the user's total in place, and
    /// inserts an award for every badge returned by
    /// [`crate::domain::newly_earned_badges`].
    async fn record(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<RecordedCompletion, CompletionLedgerError>;

    /// Delete a completion and subtract its stored `points_earned` from the
    /// owner's total. Awards are left untouched.
    async fn revert(
        &self,
        completion_id: CompletionId,
    ) -> Result<RevertedCompletion, CompletionLedgerError>;

    /// List completions newest first.
    async fn list(
        &self,
        filter: CompletionFilter,
    ) -> Result<Vec<CompletionEntry>, CompletionLedgerError>;
}
