//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Users ordered by points descending, then username.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A user together with their badges.
    async fn get_user_profile(&self, id: UserId) -> Result<UserProfile, Error>;
}
