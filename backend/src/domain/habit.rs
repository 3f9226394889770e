//! Habits and their completion statistics.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{HabitId, UserId};

/// Maximum length of a habit name, in characters.
pub const HABIT_NAME_MAX: usize = 100;
/// Points awarded per completion when the caller does not choose a value.
pub const DEFAULT_POINTS_PER_COMPLETION: u32 = 10;
/// Upper bound for points awarded per completion.
pub const MAX_POINTS_PER_COMPLETION: u32 = 10_000;

/// Validation errors for habit input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HabitValidationError {
    #[error("habit name must not be empty")]
    EmptyName,
    #[error("habit name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("points per completion must be between 0 and {max}")]
    PointsOutOfRange { max: u32 },
}

/// Display name of a habit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HabitName(String);

impl HabitName {
    /// Validate and construct a [`HabitName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, HabitValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if trimmed.chars().count() > HABIT_NAME_MAX {
            return Err(HabitValidationError::NameTooLong {
                max: HABIT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for HabitName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for HabitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a caller supplied points value.
///
/// # Examples
/// ```
/// use habits_backend::domain::habit::points_per_completion;
///
/// assert_eq!(points_per_completion(25), Ok(25));
/// assert!(points_per_completion(-1).is_err());
/// ```
pub fn points_per_completion(value: i64) -> Result<u32, HabitValidationError> {
    u32::try_from(value)
        .ok()
        .filter(|points| *points <= MAX_POINTS_PER_COMPLETION)
        .ok_or(HabitValidationError::PointsOutOfRange {
            max: MAX_POINTS_PER_COMPLETION,
        })
}

/// Recurring activity owned by a user.
///
/// Completions snapshot `points_per_completion` when they are recorded, so
/// later edits never change historical point values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: HabitName,
    pub description: String,
    pub points_per_completion: u32,
    pub reward_description: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub user_id: UserId,
    pub name: HabitName,
    pub description: String,
    pub points_per_completion: u32,
    pub reward_description: String,
}

impl NewHabit {
    /// Habit with default points and empty descriptions.
    pub fn new(user_id: UserId, name: HabitName) -> Self {
        Self {
            user_id,
            name,
            description: String::new(),
            points_per_completion: DEFAULT_POINTS_PER_COMPLETION,
            reward_description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_points_per_completion(mut self, points: u32) -> Self {
        self.points_per_completion = points;
        self
    }

    #[must_use]
    pub fn with_reward_description(mut self, reward: impl Into<String>) -> Self {
        self.reward_description = reward.into();
        self
    }
}

/// Partial update for a habit; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitUpdate {
    pub name: Option<HabitName>,
    pub description: Option<String>,
    pub points_per_completion: Option<u32>,
    pub reward_description: Option<String>,
}

impl HabitUpdate {
    /// True when the update would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.points_per_completion.is_none()
            && self.reward_description.is_none()
    }
}

/// Habit with its owner's username, as shown in the global listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitListing {
    pub habit: Habit,
    pub owner_username: String,
}

/// Habit with aggregate completion statistics for its owner's dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitOverview {
    pub habit: Habit,
    pub total_completions: u64,
    pub last_completion: Option<DateTime<Utc>>,
}

/// Outcome of deleting a habit and rolling back its completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitRetirement {
    pub habit_id: HabitId,
    pub completions_reverted: u64,
    pub points_reverted: u64,
}
