//! `HabitRepository` over the in-memory store.

use async_trait::async_trait;

use crate::domain::ports::{HabitRepository, HabitRepositoryError};
use crate::domain::{
    Habit, HabitId, HabitListing, HabitOverview, HabitRetirement, HabitUpdate, NewHabit, UserId,
};

use super::{InMemoryStore, LedgerStep, checkpoint};

fn newest_first(left: &Habit, right: &Habit) -> std::cmp::Ordering {
    right
        .created_at
        .cmp(&left.created_at)
        .then_with(|| left.id.cmp(&right.id))
}

#[async_trait]
impl HabitRepository for InMemoryStore {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitRepositoryError> {
        let now = self.now();
        self.transact(|state| {
            if !state.users.contains_key(&habit.user_id) {
                return Err(HabitRepositoryError::owner_not_found(habit.user_id));
            }
            let created = Habit {
                id: HabitId::random(),
                user_id: habit.user_id,
                name: habit.name.clone(),
                description: habit.description.clone(),
                points_per_completion: habit.points_per_completion,
                reward_description: habit.reward_description.clone(),
                created_at: now,
            };
            state.habits.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn find(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError> {
        self.read(|state| Ok(state.habits.get(id).cloned()))
    }

    async fn list(&self) -> Result<Vec<HabitListing>, HabitRepositoryError> {
        self.read(|state| {
            let mut habits: Vec<&Habit> = state.habits.values().collect();
            habits.sort_by(|left, right| newest_first(left, right));
            Ok(habits
                .into_iter()
                .filter_map(|habit| {
                    let owner = state.users.get(&habit.user_id)?;
                    Some(HabitListing {
                        habit: habit.clone(),
                        owner_username: owner.username.to_string(),
                    })
                })
                .collect())
        })
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HabitOverview>, HabitRepositoryError> {
        self.read(|state| {
            if !state.users.contains_key(user_id) {
                return Err(HabitRepositoryError::owner_not_found(*user_id));
            }
            let mut habits: Vec<&Habit> = state
                .habits
                .values()
                .filter(|habit| habit.user_id == *user_id)
                .collect();
            habits.sort_by(|left, right| newest_first(left, right));
            Ok(habits
                .into_iter()
                .map(|habit| {
                    let completions = state
                        .completions
                        .values()
                        .filter(|completion| completion.habit_id == habit.id);
                    let (total_completions, last_completion) =
                        completions.fold((0_u64, None), |(count, last), completion| {
                            let last = last.max(Some(completion.completion_date));
                            (count + 1, last)
                        });
                    HabitOverview {
                        habit: habit.clone(),
                        total_completions,
                        last_completion,
                    }
                })
                .collect())
        })
    }

    async fn update(
        &self,
        id: &HabitId,
        update: &HabitUpdate,
    ) -> Result<Habit, HabitRepositoryError> {
        self.transact(|state| {
            let habit = state
                .habits
                .get_mut(id)
                .ok_or_else(|| HabitRepositoryError::not_found(*id))?;
            if let Some(name) = &update.name {
                habit.name = name.clone();
            }
            if let Some(description) = &update.description {
                habit.description = description.clone();
            }
            if let Some(points) = update.points_per_completion {
                habit.points_per_completion = points;
            }
            if let Some(reward) = &update.reward_description {
                habit.reward_description = reward.clone();
            }
            Ok(habit.clone())
        })
    }

    async fn retire(&self, id: &HabitId) -> Result<HabitRetirement, HabitRepositoryError> {
        let fail_at = self.take_injected_failure()?;
        let habit_id = *id;

        self.transact(|state| {
            if !state.habits.contains_key(&habit_id) {
                return Err(HabitRepositoryError::not_found(habit_id));
            }
            let completion_ids: Vec<_> = state
                .completions
                .values()
                .filter(|completion| completion.habit_id == habit_id)
                .map(|completion| completion.id)
                .collect();

            let mut points_reverted = 0_u64;
            for completion_id in &completion_ids {
                checkpoint(fail_at, LedgerStep::DeleteCompletion)
                    .map_err(HabitRepositoryError::query)?;
                let Some(completion) = state.completions.remove(completion_id) else {
                    continue;
                };
                checkpoint(fail_at, LedgerStep::DebitPoints).map_err(HabitRepositoryError::query)?;
                if let Some(owner) = state.users.get_mut(&completion.user_id) {
                    owner.total_points = owner
                        .total_points
                        .checked_sub(completion.points_earned)
                        .ok_or_else(|| {
                            HabitRepositoryError::query("total_points would become negative")
                        })?;
                }
                points_reverted += u64::from(completion.points_earned);
            }
            state.habits.remove(&habit_id);

            Ok(HabitRetirement {
                habit_id,
                completions_reverted: completion_ids.len() as u64,
                points_reverted,
            })
        })
    }
}
