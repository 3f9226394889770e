//! Badge catalogue, awards, and the threshold evaluator.
//!
//! Badges are milestones keyed on a user's running point total. Awards are
//! permanent: once a user holds a badge it stays theirs even if a deleted
//! completion later drops their total back below the threshold.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use super::BadgeId;

/// Maximum length of a badge name, in characters.
pub const BADGE_NAME_MAX: usize = 100;

/// Catalogue seeded into new deployments as `(name, description, threshold)`.
pub const DEFAULT_BADGES: [(&str, &str, u32); 5] = [
    ("First Step", "Earned your first 10 points", 10),
    ("Dedicated", "Reached 100 points", 100),
    ("Consistent", "Reached 200 points", 200),
    ("Habit Master", "Reached 500 points", 500),
    ("Legend", "Reached 1000 points", 1000),
];

/// Validation errors for badge input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BadgeValidationError {
    #[error("badge name must not be empty")]
    EmptyName,
    #[error("badge name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("points threshold must be between 0 and {max}")]
    ThresholdOutOfRange { max: u32 },
}

/// Unique display name of a badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadgeName(String);

impl BadgeName {
    /// Validate and construct a [`BadgeName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, BadgeValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BadgeValidationError::EmptyName);
        }
        if trimmed.chars().count() > BADGE_NAME_MAX {
            return Err(BadgeValidationError::NameTooLong {
                max: BADGE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BadgeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BadgeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Largest threshold the store can represent.
pub const MAX_POINTS_THRESHOLD: u32 = i32::MAX as u32;

/// Validate a caller supplied threshold.
pub fn points_threshold(value: i64) -> Result<u32, BadgeValidationError> {
    u32::try_from(value)
        .ok()
        .filter(|threshold| *threshold <= MAX_POINTS_THRESHOLD)
        .ok_or(BadgeValidationError::ThresholdOutOfRange {
            max: MAX_POINTS_THRESHOLD,
        })
}

/// Milestone unlocked once a user's total reaches `points_threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: BadgeId,
    pub name: BadgeName,
    pub description: String,
    pub points_threshold: u32,
}

/// Input for adding a badge to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBadge {
    pub name: BadgeName,
    pub description: String,
    pub points_threshold: u32,
}

impl NewBadge {
    /// The default catalogue as creation inputs.
    pub fn defaults() -> Result<Vec<Self>, BadgeValidationError> {
        DEFAULT_BADGES
            .iter()
            .map(|(name, description, threshold)| {
                Ok(Self {
                    name: BadgeName::new(*name)?,
                    description: (*description).to_owned(),
                    points_threshold: *threshold,
                })
            })
            .collect()
    }
}

/// Partial update for a badge; `None` leaves the column untouched.
///
/// Raising a threshold never revokes awards already made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeUpdate {
    pub name: Option<BadgeName>,
    pub description: Option<String>,
    pub points_threshold: Option<u32>,
}

impl BadgeUpdate {
    /// True when the update would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.points_threshold.is_none()
    }
}

/// A badge held by a user and the moment it was awarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeAward {
    pub badge: Badge,
    pub awarded_date: DateTime<Utc>,
}

/// Select the badges a user qualifies for but does not yet hold.
///
/// Returns every catalogue entry whose threshold is at or below
/// `total_points` and whose id is absent from `already_awarded`, in
/// ascending threshold order. Catalogue duplicates are reported once.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
///
/// use habits_backend::domain::{Badge, BadgeId, BadgeName, newly_earned_badges};
///
/// let first_step = Badge {
///     id: BadgeId::random(),
///     name: BadgeName::new("First Step").expect("name"),
///     description: String::new(),
///     points_threshold: 10,
/// };
/// let catalogue = [first_step.clone()];
///
/// let earned = newly_earned_badges(10, &HashSet::new(), &catalogue);
/// assert_eq!(earned, vec![&first_step]);
///
/// let held = HashSet::from([first_step.id]);
/// assert!(newly_earned_badges(500, &held, &catalogue).is_empty());
/// ```
pub fn newly_earned_badges<'a>(
    total_points: u32,
    already_awarded: &HashSet<BadgeId>,
    catalogue: &'a [Badge],
) -> Vec<&'a Badge> {
    let mut seen = HashSet::new();
    let mut earned: Vec<&Badge> = catalogue
        .iter()
        .filter(|badge| badge.points_threshold <= total_points)
        .filter(|badge| !already_awarded.contains(&badge.id))
        .filter(|badge| seen.insert(badge.id))
        .collect();
    earned.sort_by(|left, right| {
        left.points_threshold
            .cmp(&right.points_threshold)
            .then_with(|| left.name.as_ref().cmp(right.name.as_ref()))
    });
    earned
}
