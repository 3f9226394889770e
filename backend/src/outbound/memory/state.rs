//! Committed rows of the in-memory store.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::domain::{
    Badge, BadgeAward, BadgeId, Completion, CompletionId, Habit, HabitId, NewBadge, User, UserId,
    newly_earned_badges,
};

/// Table-per-map snapshot; cloned for every unit of work.
#[derive(Debug, Clone, Default)]
pub(super) struct StoreState {
    pub(super) users: BTreeMap<UserId, User>,
    pub(super) habits: BTreeMap<HabitId, Habit>,
    pub(super) completions: BTreeMap<CompletionId, Completion>,
    pub(super) badges: BTreeMap<BadgeId, Badge>,
    pub(super) awards: BTreeMap<(UserId, BadgeId), DateTime<Utc>>,
}

impl StoreState {
    pub(super) fn insert_badge(&mut self, id: BadgeId, badge: NewBadge) -> Badge {
        let badge = Badge {
            id,
            name: badge.name,
            description: badge.description,
            points_threshold: badge.points_threshold,
        };
        self.badges.insert(id, badge.clone());
        badge
    }

    /// Awards held by `user_id`, newest first then by badge name.
    pub(super) fn awards_for(&self, user_id: UserId) -> Vec<BadgeAward> {
        let mut awards: Vec<BadgeAward> = self
            .awards
            .iter()
            .filter(|((holder, _), _)| *holder == user_id)
            .filter_map(|((_, badge_id), awarded_date)| {
                self.badges.get(badge_id).map(|badge| BadgeAward {
                    badge: badge.clone(),
                    awarded_date: *awarded_date,
                })
            })
            .collect();
        awards.sort_by(|left, right| {
            right
                .awarded_date
                .cmp(&left.awarded_date)
                .then_with(|| left.badge.name.as_ref().cmp(right.badge.name.as_ref()))
        });
        awards
    }

    /// Grant every newly earned badge and return the ones granted.
    pub(super) fn award_badges(
        &mut self,
        user_id: UserId,
        total_points: u32,
        awarded_date: DateTime<Utc>,
    ) -> Vec<Badge> {
        let held: HashSet<BadgeId> = self
            .awards
            .keys()
            .filter(|(holder, _)| *holder == user_id)
            .map(|(_, badge_id)| *badge_id)
            .collect();
        let catalogue: Vec<Badge> = self.badges.values().cloned().collect();
        let earned: Vec<Badge> = newly_earned_badges(total_points, &held, &catalogue)
            .into_iter()
            .cloned()
            .collect();
        for badge in &earned {
            self.awards.entry((user_id, badge.id)).or_insert(awarded_date);
        }
        earned
    }

    pub(super) fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| Some(user.id) != except && user.username.as_ref() == username)
    }

    pub(super) fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| Some(user.id) != except && user.email.as_ref() == email)
    }

    pub(super) fn badge_name_taken(&self, name: &str, except: Option<BadgeId>) -> bool {
        self.badges
            .values()
            .any(|badge| Some(badge.id) != except && badge.name.as_ref() == name)
    }
}
