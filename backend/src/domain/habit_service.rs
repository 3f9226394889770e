//! Habit domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{HabitCommand, HabitQuery, HabitRepository, HabitRepositoryError};
use crate::domain::{
    Error, Habit, HabitId, HabitListing, HabitOverview, HabitRetirement, HabitUpdate, NewHabit,
    UserId,
};

/// Habit service implementing [`HabitCommand`] and [`HabitQuery`].
#[derive(Clone)]
pub struct HabitService<R> {
    repo: Arc<R>,
}

impl<R> HabitService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn habit_not_found(id: &HabitId) -> Error {
    Error::not_found("habit not found").with_details(json!({ "habit_id": id.to_string() }))
}

fn map_habit_error(err: HabitRepositoryError) -> Error {
    match err {
        HabitRepositoryError::NotFound { habit_id } => habit_not_found(&habit_id),
        HabitRepositoryError::OwnerNotFound { user_id } => Error::not_found("user not found")
            .with_details(json!({ "user_id": user_id.to_string() })),
        HabitRepositoryError::Connection { message } => {
            Error::internal(format!("habit repository unavailable: {message}"))
        }
        HabitRepositoryError::Query { message } => {
            Error::internal(format!("habit repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> HabitCommand for HabitService<R>
where
    R: HabitRepository,
{
    async fn create_habit(&self, habit: NewHabit) -> Result<Habit, Error> {
        self.repo.create(&habit).await.map_err(map_habit_error)
    }

    async fn update_habit(&self, id: HabitId, update: HabitUpdate) -> Result<Habit, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        self.repo.update(&id, &update).await.map_err(map_habit_error)
    }

    async fn delete_habit(&self, id: HabitId) -> Result<HabitRetirement, Error> {
        let retirement = self.repo.retire(&id).await.map_err(map_habit_error)?;
        info!(
            habit_id = %id,
            completions = retirement.completions_reverted,
            points = retirement.points_reverted,
            "habit retired"
        );
        Ok(retirement)
    }
}

#[async_trait]
impl<R> HabitQuery for HabitService<R>
where
    R: HabitRepository,
{
    async fn list_habits(&self) -> Result<Vec<HabitListing>, Error> {
        self.repo.list().await.map_err(map_habit_error)
    }

    async fn list_habits_for_user(&self, user_id: UserId) -> Result<Vec<HabitOverview>, Error> {
        self.repo
            .list_for_user(&user_id)
            .await
            .map_err(map_habit_error)
    }

    async fn get_habit(&self, id: HabitId) -> Result<Habit, Error> {
        self.repo
            .find(&id)
            .await
            .map_err(map_habit_error)?
            .ok_or_else(|| habit_not_found(&id))
    }
}
