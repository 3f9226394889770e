//! Driving port for recording and deleting completions.
//!
//! Inbound adapters call [`CompletionCommand`] after validating that both
//! identifiers are present; the implementation owns the transactional
//! semantics described on [`super::CompletionLedger`].

use async_trait::async_trait;

use crate::domain::{CompletionId, Error, HabitId, RecordedCompletion, RevertedCompletion, UserId};

/// Domain use-case port for the completion award transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionCommand: Send + Sync {
    /// Record that `user_id` completed `habit_id`.
    ///
    /// # Errors
    ///
    /// - `not_found` when the habit or user does not exist.
    /// - `internal_error` when any step fails; nothing is persisted.
    async fn record_completion(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<RecordedCompletion, Error>;

    /// Delete a completion and roll its points back. Badges are kept.
    async fn delete_completion(
        &self,
        completion_id: CompletionId,
    ) -> Result<RevertedCompletion, Error>;
}
