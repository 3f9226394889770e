//! Completion domain service.
//!
//! Implements the completion driving ports over a [`CompletionLedger`]. The
//! ledger owns the transaction; this service maps its failures into domain
//! errors and records structured events for committed units of work.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    CompletionCommand, CompletionLedger, CompletionLedgerError, CompletionQuery,
};
use crate::domain::{
    CompletionEntry, CompletionFilter, CompletionId, Error, HabitId, RecordedCompletion,
    RevertedCompletion, UserId,
};

/// Completion service implementing [`CompletionCommand`] and
/// [`CompletionQuery`].
#[derive(Clone)]
pub struct CompletionService<L> {
    ledger: Arc<L>,
}

impl<L> CompletionService<L> {
    /// Create a new service over the given ledger.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

fn map_ledger_error(err: CompletionLedgerError) -> Error {
    match err {
        CompletionLedgerError::HabitNotFound { habit_id } => Error::not_found("habit not found")
            .with_details(json!({ "habit_id": habit_id.to_string() })),
        CompletionLedgerError::UserNotFound { user_id } => Error::not_found("user not found")
            .with_details(json!({ "user_id": user_id.to_string() })),
        CompletionLedgerError::CompletionNotFound { completion_id } => {
            Error::not_found("completion not found")
                .with_details(json!({ "completion_id": completion_id.to_string() }))
        }
        CompletionLedgerError::Connection { message } => {
            error!(%message, "completion ledger unavailable");
            Error::internal(format!("completion ledger unavailable: {message}"))
        }
        CompletionLedgerError::Query { message } => {
            error!(%message, "completion transaction rolled back");
            Error::internal(format!("completion ledger error: {message}"))
        }
    }
}

#[async_trait]
impl<L> CompletionCommand for CompletionService<L>
where
    L: CompletionLedger,
{
    async fn record_completion(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<RecordedCompletion, Error> {
        let recorded = self
            .ledger
            .record(habit_id, user_id)
            .await
            .map_err(map_ledger_error)?;
        info!(
            completion_id = %recorded.completion.id,
            %habit_id,
            %user_id,
            points = recorded.completion.points_earned,
            total_points = recorded.total_points,
            awarded = recorded.awarded_badges.len(),
            "habit completion recorded"
        );
        Ok(recorded)
    }

    async fn delete_completion(
        &self,
        completion_id: CompletionId,
    ) -> Result<RevertedCompletion, Error> {
        let reverted = self
            .ledger
            .revert(completion_id)
            .await
            .map_err(map_ledger_error)?;
        info!(
            %completion_id,
            user_id = %reverted.user_id,
            points = reverted.points_reverted,
            total_points = reverted.total_points,
            "habit completion reverted"
        );
        Ok(reverted)
    }
}

#[async_trait]
impl<L> CompletionQuery for CompletionService<L>
where
    L: CompletionLedger,
{
    async fn list_completions(
        &self,
        filter: CompletionFilter,
    ) -> Result<Vec<CompletionEntry>, Error> {
        self.ledger.list(filter).await.map_err(map_ledger_error)
    }
}

#[cfg(test)]
#[path = "completion_service_tests.rs"]
mod tests;
