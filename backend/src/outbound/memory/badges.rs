//! `BadgeRepository` over the in-memory store.

use async_trait::async_trait;

use crate::domain::ports::{BadgeRepository, BadgeRepositoryError};
use crate::domain::{Badge, BadgeAward, BadgeId, BadgeUpdate, NewBadge, UserId};

use super::InMemoryStore;

#[async_trait]
impl BadgeRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Badge>, BadgeRepositoryError> {
        self.read(|state| {
            let mut badges: Vec<Badge> = state.badges.values().cloned().collect();
            badges.sort_by(|left, right| {
                left.points_threshold
                    .cmp(&right.points_threshold)
                    .then_with(|| left.name.as_ref().cmp(right.name.as_ref()))
            });
            Ok(badges)
        })
    }

    async fn awards_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BadgeAward>, BadgeRepositoryError> {
        self.read(|state| {
            if !state.users.contains_key(user_id) {
                return Err(BadgeRepositoryError::user_not_found(*user_id));
            }
            Ok(state.awards_for(*user_id))
        })
    }

    async fn create(&self, badge: &NewBadge) -> Result<Badge, BadgeRepositoryError> {
        self.transact(|state| {
            if state.badge_name_taken(badge.name.as_ref(), None) {
                return Err(BadgeRepositoryError::duplicate_name(badge.name.as_ref()));
            }
            Ok(state.insert_badge(BadgeId::random(), badge.clone()))
        })
    }

    async fn update(
        &self,
        id: &BadgeId,
        update: &BadgeUpdate,
    ) -> Result<Badge, BadgeRepositoryError> {
        self.transact(|state| {
            if let Some(name) = &update.name
                && state.badge_name_taken(name.as_ref(), Some(*id))
            {
                return Err(BadgeRepositoryError::duplicate_name(name.as_ref()));
            }
            let badge = state
                .badges
                .get_mut(id)
                .ok_or_else(|| BadgeRepositoryError::not_found(*id))?;
            if let Some(name) = &update.name {
                badge.name = name.clone();
            }
            if let Some(description) = &update.description {
                badge.description = description.clone();
            }
            if let Some(threshold) = update.points_threshold {
                badge.points_threshold = threshold;
            }
            Ok(badge.clone())
        })
    }

    async fn delete(&self, id: &BadgeId) -> Result<(), BadgeRepositoryError> {
        self.transact(|state| {
            if state.badges.remove(id).is_none() {
                return Err(BadgeRepositoryError::not_found(*id));
            }
            state.awards.retain(|(_, badge_id), _| badge_id != id);
            Ok(())
        })
    }
}
