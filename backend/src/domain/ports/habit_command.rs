//! Driving port for habit mutations.

use async_trait::async_trait;

use crate::domain::{Error, Habit, HabitId, HabitRetirement, HabitUpdate, NewHabit};

/// Domain use-case port for creating, editing, and retiring habits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitCommand: Send + Sync {
    async fn create_habit(&self, habit: NewHabit) -> Result<Habit, Error>;

    /// Apply `update`; an empty change set is rejected as `invalid_request`.
    async fn update_habit(&self, id: HabitId, update: HabitUpdate) -> Result<Habit, Error>;

    /// Retire the habit, reverting the points of each of its completions.
    async fn delete_habit(&self, id: HabitId) -> Result<HabitRetirement, Error>;
}
