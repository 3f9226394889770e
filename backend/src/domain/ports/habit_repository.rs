//! Port for habit persistence.

use async_trait::async_trait;

use crate::domain::{
    Habit, HabitId, HabitListing, HabitOverview, HabitRetirement, HabitUpdate, NewHabit, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by habit repository adapters.
    pub enum HabitRepositoryError {
        /// No habit exists with the identifier.
        NotFound { habit_id: HabitId } => "habit {habit_id} not found",
        /// The owning user does not exist.
        OwnerNotFound { user_id: UserId } => "user {user_id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "habit repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "habit repository query failed: {message}",
    }
}

/// Port for habit storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HabitRepository: Send + Sync {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitRepositoryError>;

    async fn find(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError>;

    /// All habits newest first, with owner usernames.
    async fn list(&self) -> Result<Vec<HabitListing>, HabitRepositoryError>;

    /// A user's habits newest first with completion statistics.
    ///
    /// Fails with [`HabitRepositoryError::OwnerNotFound`] for unknown users.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HabitOverview>, HabitRepositoryError>;

    /// Apply a non-empty change set. Recorded completions keep their points.
    async fn update(&self, id: &HabitId, update: &HabitUpdate)
    -> Result<Habit, HabitRepositoryError>;

    /// Delete the habit after reverting every completion's points, in one
    /// transaction.
    async fn retire(&self, id: &HabitId) -> Result<HabitRetirement, HabitRepositoryError>;
}
