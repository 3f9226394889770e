//! `CompletionLedger` over the in-memory store.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CompletionLedger, CompletionLedgerError};
use crate::domain::{
    Completion, CompletionEntry, CompletionFilter, CompletionId, HabitId, RecordedCompletion,
    RevertedCompletion, UserId,
};

use super::{InMemoryStore, LedgerStep, checkpoint};

#[async_trait]
impl CompletionLedger for InMemoryStore {
    async fn record(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<RecordedCompletion, CompletionLedgerError> {
        let fail_at = self.take_injected_failure()?;
        let now = self.now();

        self.transact(|state| {
            let points_earned = state
                .habits
                .get(&habit_id)
                .map(|habit| habit.points_per_completion)
                .ok_or_else(|| CompletionLedgerError::habit_not_found(habit_id))?;
            if !state.users.contains_key(&user_id) {
                return Err(CompletionLedgerError::user_not_found(user_id));
            }

            checkpoint(fail_at, LedgerStep::InsertCompletion)
                .map_err(CompletionLedgerError::query)?;
            let completion = Completion {
                id: CompletionId::random(),
                habit_id,
                user_id,
                completion_date: now,
                points_earned,
            };
            state.completions.insert(completion.id, completion.clone());

            checkpoint(fail_at, LedgerStep::CreditPoints).map_err(CompletionLedgerError::query)?;
            let user = state
                .users
                .get_mut(&user_id)
                .ok_or_else(|| CompletionLedgerError::user_not_found(user_id))?;
            user.total_points = user
                .total_points
                .checked_add(points_earned)
                .ok_or_else(|| CompletionLedgerError::query("total_points out of range"))?;
            let total_points = user.total_points;

            checkpoint(fail_at, LedgerStep::AwardBadges).map_err(CompletionLedgerError::query)?;
            let awarded_badges = state.award_badges(user_id, total_points, now);

            Ok(RecordedCompletion {
                completion,
                total_points,
                awarded_badges,
            })
        })
    }

    async fn revert(
        &self,
        completion_id: CompletionId,
    ) -> Result<RevertedCompletion, CompletionLedgerError> {
        let fail_at = self.take_injected_failure()?;

        self.transact(|state| {
            checkpoint(fail_at, LedgerStep::DeleteCompletion)
                .map_err(CompletionLedgerError::query)?;
            let completion = state
                .completions
                .remove(&completion_id)
                .ok_or_else(|| CompletionLedgerError::completion_not_found(completion_id))?;

            checkpoint(fail_at, LedgerStep::DebitPoints).map_err(CompletionLedgerError::query)?;
            let user = state
                .users
                .get_mut(&completion.user_id)
                .ok_or_else(|| CompletionLedgerError::user_not_found(completion.user_id))?;
            user.total_points = user
                .total_points
                .checked_sub(completion.points_earned)
                .ok_or_else(|| CompletionLedgerError::query("total_points would become negative"))?;

            Ok(RevertedCompletion {
                completion_id,
                user_id: completion.user_id,
                points_reverted: completion.points_earned,
                total_points: user.total_points,
            })
        })
    }

    async fn list(
        &self,
        filter: CompletionFilter,
    ) -> Result<Vec<CompletionEntry>, CompletionLedgerError> {
        let entries = self.read(|state| {
            let mut entries: Vec<CompletionEntry> = state
                .completions
                .values()
                .filter(|completion| match filter {
                    CompletionFilter::All => true,
                    CompletionFilter::ByUser(user_id) => completion.user_id == user_id,
                    CompletionFilter::ByHabit(habit_id) => completion.habit_id == habit_id,
                })
                .filter_map(|completion| {
                    let habit = state.habits.get(&completion.habit_id)?;
                    let user = state.users.get(&completion.user_id)?;
                    Some(CompletionEntry {
                        completion: completion.clone(),
                        habit_name: habit.name.to_string(),
                        username: user.username.to_string(),
                    })
                })
                .collect();
            entries.sort_by(|left, right| {
                right
                    .completion
                    .completion_date
                    .cmp(&left.completion.completion_date)
                    .then_with(|| left.completion.id.cmp(&right.completion.id))
            });
            Ok::<_, CompletionLedgerError>(entries)
        })?;
        debug!(count = entries.len(), ?filter, "loaded completions");
        Ok(entries)
    }
}
