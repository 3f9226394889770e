//! Driving port for habit lookups.

use async_trait::async_trait;

use crate::domain::{Error, Habit, HabitId, HabitListing, HabitOverview, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitQuery: Send + Sync {
    async fn list_habits(&self) -> Result<Vec<HabitListing>, Error>;

    async fn list_habits_for_user(&self, user_id: UserId) -> Result<Vec<HabitOverview>, Error>;

    async fn get_habit(&self, id: HabitId) -> Result<Habit, Error>;
}
