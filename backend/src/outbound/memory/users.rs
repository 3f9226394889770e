//! `UserRepository` over the in-memory store.

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, User, UserId, UserProfile, UserUpdate};

use super::InMemoryStore;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let now = self.now();
        self.transact(|state| {
            if state.username_taken(user.username.as_ref(), None) {
                return Err(UserRepositoryError::duplicate_username(user.username.as_ref()));
            }
            if state.email_taken(user.email.as_ref(), None) {
                return Err(UserRepositoryError::duplicate_email(user.email.as_ref()));
            }
            let created = User {
                id: UserId::random(),
                username: user.username.clone(),
                email: user.email.clone(),
                total_points: 0,
                created_at: now,
            };
            state.users.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        self.read(|state| {
            let mut users: Vec<User> = state.users.values().cloned().collect();
            users.sort_by(|left, right| {
                right
                    .total_points
                    .cmp(&left.total_points)
                    .then_with(|| left.username.as_ref().cmp(right.username.as_ref()))
                    .then_with(|| left.id.cmp(&right.id))
            });
            Ok(users)
        })
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        self.read(|state| {
            Ok(state.users.get(id).map(|user| UserProfile {
                user: user.clone(),
                badges: state.awards_for(*id),
            }))
        })
    }

    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, UserRepositoryError> {
        self.transact(|state| {
            if let Some(username) = &update.username
                && state.username_taken(username.as_ref(), Some(*id))
            {
                return Err(UserRepositoryError::duplicate_username(username.as_ref()));
            }
            if let Some(email) = &update.email
                && state.email_taken(email.as_ref(), Some(*id))
            {
                return Err(UserRepositoryError::duplicate_email(email.as_ref()));
            }
            let user = state
                .users
                .get_mut(id)
                .ok_or_else(|| UserRepositoryError::not_found(*id))?;
            if let Some(username) = &update.username {
                user.username = username.clone();
            }
            if let Some(email) = &update.email {
                user.email = email.clone();
            }
            Ok(user.clone())
        })
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        self.transact(|state| {
            if state.users.remove(id).is_none() {
                return Err(UserRepositoryError::not_found(*id));
            }
            state.habits.retain(|_, habit| habit.user_id != *id);
            let habits = &state.habits;
            state.completions.retain(|_, completion| {
                completion.user_id != *id && habits.contains_key(&completion.habit_id)
            });
            state.awards.retain(|(holder, _), _| holder != id);
            Ok(())
        })
    }
}
