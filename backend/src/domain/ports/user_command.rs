//! Driving port for user registration and maintenance.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserId, UserUpdate};

/// Domain use-case port for user mutations.
///
/// Duplicate usernames or email addresses surface as `conflict` errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    async fn register_user(&self, user: NewUser) -> Result<User, Error>;

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, Error>;

    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
