//! Driving port for badge lookups.

use async_trait::async_trait;

use crate::domain::{Badge, BadgeAward, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeQuery: Send + Sync {
    async fn list_badges(&self) -> Result<Vec<Badge>, Error>;

    async fn list_awards_for_user(&self, user_id: UserId) -> Result<Vec<BadgeAward>, Error>;
}
