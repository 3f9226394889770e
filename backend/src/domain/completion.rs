//! Completion records and the outcomes of the award transaction.

use chrono::{DateTime, Utc};

use super::{Badge, CompletionId, HabitId, UserId};

/// One instance of a user performing a habit.
///
/// `points_earned` is the habit's value at the moment of completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: CompletionId,
    pub habit_id: HabitId,
    pub user_id: UserId,
    pub completion_date: DateTime<Utc>,
    pub points_earned: u32,
}

/// Completion joined with the names shown in history views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub completion: Completion,
    pub habit_name: String,
    pub username: String,
}

/// Selects which completions a history listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionFilter {
    #[default]
    All,
    ByUser(UserId),
    ByHabit(HabitId),
}

/// Result of a committed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCompletion {
    pub completion: Completion,
    /// The user's point total after the increment.
    pub total_points: u32,
    /// Badges awarded by this completion, ascending by threshold.
    pub awarded_badges: Vec<Badge>,
}

/// Result of deleting a completion and reversing its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertedCompletion {
    pub completion_id: CompletionId,
    pub user_id: UserId,
    pub points_reverted: u32,
    /// The user's point total after the decrement.
    pub total_points: u32,
}
