//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation so malformed rows surface as query errors
//! rather than panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Badge, BadgeId, BadgeName, BadgeValidationError, Completion, CompletionId, EmailAddress, Habit,
    HabitId, HabitName, HabitValidationError, User, UserId, UserValidationError, Username,
};

use super::schema::{badges, completions, habits, user_badges, users};

/// Failure converting a stored row into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("stored user is invalid: {0}")]
    User(#[from] UserValidationError),
    #[error("stored habit is invalid: {0}")]
    Habit(#[from] HabitValidationError),
    #[error("stored badge is invalid: {0}")]
    Badge(#[from] BadgeValidationError),
    #[error("stored {column} is negative")]
    NegativeValue { column: &'static str },
}

/// Convert a non-negative `INTEGER` column into the domain's `u32`.
pub(crate) fn non_negative(value: i32, column: &'static str) -> Result<u32, RowConversionError> {
    u32::try_from(value).map_err(|_| RowConversionError::NegativeValue { column })
}

/// Convert a domain points value into an `INTEGER` bind parameter.
///
/// Domain validation keeps every stored value within `i32`; larger values
/// saturate and are rejected by the column's check constraint.
pub(crate) fn to_db_points(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub total_points: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            total_points: non_negative(row.total_points, "total_points")?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
}

/// Change set for user edits; `total_points` is deliberately absent.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Habits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = habits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HabitRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub points_per_completion: i32,
    pub reward_description: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<HabitRow> for Habit {
    type Error = RowConversionError;

    fn try_from(row: HabitRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: HabitId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            name: HabitName::new(row.name)?,
            description: row.description,
            points_per_completion: non_negative(
                row.points_per_completion,
                "points_per_completion",
            )?,
            reward_description: row.reward_description,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = habits)]
pub(crate) struct NewHabitRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub points_per_completion: i32,
    pub reward_description: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = habits)]
pub(crate) struct HabitChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub points_per_completion: Option<i32>,
    pub reward_description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = completions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompletionRow {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub completion_date: DateTime<Utc>,
    pub points_earned: i32,
}

impl TryFrom<CompletionRow> for Completion {
    type Error = RowConversionError;

    fn try_from(row: CompletionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CompletionId::from_uuid(row.id),
            habit_id: HabitId::from_uuid(row.habit_id),
            user_id: UserId::from_uuid(row.user_id),
            completion_date: row.completion_date,
            points_earned: non_negative(row.points_earned, "points_earned")?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = completions)]
pub(crate) struct NewCompletionRow {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub points_earned: i32,
}

// ---------------------------------------------------------------------------
// Badges and awards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = badges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BadgeRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub points_threshold: i32,
}

impl TryFrom<BadgeRow> for Badge {
    type Error = RowConversionError;

    fn try_from(row: BadgeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BadgeId::from_uuid(row.id),
            name: BadgeName::new(row.name)?,
            description: row.description,
            points_threshold: non_negative(row.points_threshold, "points_threshold")?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = badges)]
pub(crate) struct NewBadgeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub points_threshold: i32,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = badges)]
pub(crate) struct BadgeChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub points_threshold: Option<i32>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_badges)]
pub(crate) struct NewUserBadgeRow {
    pub user_id: Uuid,
    pub badge_id: Uuid,
}
