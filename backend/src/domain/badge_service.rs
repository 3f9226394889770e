//! Badge domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{BadgeCommand, BadgeQuery, BadgeRepository, BadgeRepositoryError};
use crate::domain::{Badge, BadgeAward, BadgeId, BadgeUpdate, Error, NewBadge, UserId};

/// Badge service implementing [`BadgeCommand`] and [`BadgeQuery`].
#[derive(Clone)]
pub struct BadgeService<R> {
    repo: Arc<R>,
}

impl<R> BadgeService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_badge_error(err: BadgeRepositoryError) -> Error {
    match err {
        BadgeRepositoryError::NotFound { badge_id } => Error::not_found("badge not found")
            .with_details(json!({ "badge_id": badge_id.to_string() })),
        BadgeRepositoryError::UserNotFound { user_id } => Error::not_found("user not found")
            .with_details(json!({ "user_id": user_id.to_string() })),
        BadgeRepositoryError::DuplicateName { name } => Error::conflict("badge name already exists")
            .with_details(json!({ "field": "name", "value": name })),
        BadgeRepositoryError::Connection { message } => {
            Error::internal(format!("badge repository unavailable: {message}"))
        }
        BadgeRepositoryError::Query { message } => {
            Error::internal(format!("badge repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> BadgeCommand for BadgeService<R>
where
    R: BadgeRepository,
{
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge, Error> {
        self.repo.create(&badge).await.map_err(map_badge_error)
    }

    async fn update_badge(&self, id: BadgeId, update: BadgeUpdate) -> Result<Badge, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        self.repo.update(&id, &update).await.map_err(map_badge_error)
    }

    async fn delete_badge(&self, id: BadgeId) -> Result<(), Error> {
        self.repo.delete(&id).await.map_err(map_badge_error)
    }
}

#[async_trait]
impl<R> BadgeQuery for BadgeService<R>
where
    R: BadgeRepository,
{
    async fn list_badges(&self) -> Result<Vec<Badge>, Error> {
        self.repo.list().await.map_err(map_badge_error)
    }

    async fn list_awards_for_user(&self, user_id: UserId) -> Result<Vec<BadgeAward>, Error> {
        self.repo
            .awards_for_user(&user_id)
            .await
            .map_err(map_badge_error)
    }
}
