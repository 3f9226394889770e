//! Driving port for badge catalogue maintenance.

use async_trait::async_trait;

use crate::domain::{Badge, BadgeId, BadgeUpdate, Error, NewBadge};

/// Domain use-case port for badge mutations.
///
/// Catalogue edits never grant or revoke awards; evaluation happens only
/// when a completion is recorded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeCommand: Send + Sync {
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge, Error>;

    async fn update_badge(&self, id: BadgeId, update: BadgeUpdate) -> Result<Badge, Error>;

    async fn delete_badge(&self, id: BadgeId) -> Result<(), Error>;
}
