//! Port for the badge catalogue and award history.

use async_trait::async_trait;

use crate::domain::{Badge, BadgeAward, BadgeId, BadgeUpdate, NewBadge, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by badge repository adapters.
    pub enum BadgeRepositoryError {
        /// No badge exists with the identifier.
        NotFound { badge_id: BadgeId } => "badge {badge_id} not found",
        /// The user whose awards were requested does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
        /// Another badge already uses the name.
        DuplicateName { name: String } => "badge {name} already exists",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "badge repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "badge repository query failed: {message}",
    }
}

/// Port for badge catalogue maintenance and award lookups.
///
/// Awards are only written by the completion ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepository: Send + Sync {
    /// Catalogue ordered by threshold, then name.
    async fn list(&self) -> Result<Vec<Badge>, BadgeRepositoryError>;

    /// Awards held by a user, newest first.
    async fn awards_for_user(&self, user_id: &UserId)
    -> Result<Vec<BadgeAward>, BadgeRepositoryError>;

    async fn create(&self, badge: &NewBadge) -> Result<Badge, BadgeRepositoryError>;

    async fn update(&self, id: &BadgeId, update: &BadgeUpdate)
    -> Result<Badge, BadgeRepositoryError>;

    /// Remove the badge and every award of it.
    async fn delete(&self, id: &BadgeId) -> Result<(), BadgeRepositoryError>;
}
