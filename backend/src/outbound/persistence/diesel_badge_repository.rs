//! PostgreSQL-backed `BadgeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BadgeRepository, BadgeRepositoryError};
use crate::domain::{Badge, BadgeAward, BadgeId, BadgeUpdate, NewBadge, UserId};

use super::diesel_error_mapping::{BADGES_NAME_KEY, classify_diesel_error, pool_error_message};
use super::models::{BadgeChangeset, BadgeRow, NewBadgeRow, to_db_points};
use super::pool::{DbPool, PoolError};
use super::schema::{badges, user_badges, users};

/// Diesel-backed badge catalogue.
#[derive(Clone)]
pub struct DieselBadgeRepository {
    pool: DbPool,
}

impl DieselBadgeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BadgeRepositoryError {
    BadgeRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, name: Option<&str>) -> BadgeRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.violates(BADGES_NAME_KEY) {
        return BadgeRepositoryError::duplicate_name(name.unwrap_or_default());
    }
    if failure.is_connection() {
        BadgeRepositoryError::connection(failure.message())
    } else {
        BadgeRepositoryError::query(failure.message())
    }
}

fn to_badge(row: BadgeRow) -> Result<Badge, BadgeRepositoryError> {
    Badge::try_from(row).map_err(|err| BadgeRepositoryError::query(err.to_string()))
}

#[async_trait]
impl BadgeRepository for DieselBadgeRepository {
    async fn list(&self) -> Result<Vec<Badge>, BadgeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        badges::table
            .select(BadgeRow::as_select())
            .order((badges::points_threshold.asc(), badges::name.asc()))
            .load::<BadgeRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?
            .into_iter()
            .map(to_badge)
            .collect()
    }

    async fn awards_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<BadgeAward>, BadgeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let exists = users::table
            .find(*user_id.as_uuid())
            .select(users::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        if exists.is_none() {
            return Err(BadgeRepositoryError::user_not_found(*user_id));
        }

        user_badges::table
            .inner_join(badges::table)
            .filter(user_badges::user_id.eq(*user_id.as_uuid()))
            .order((user_badges::awarded_date.desc(), badges::name.asc()))
            .select((BadgeRow::as_select(), user_badges::awarded_date))
            .load::<(BadgeRow, DateTime<Utc>)>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?
            .into_iter()
            .map(|(row, awarded_date)| {
                Ok(BadgeAward {
                    badge: to_badge(row)?,
                    awarded_date,
                })
            })
            .collect()
    }

    async fn create(&self, badge: &NewBadge) -> Result<Badge, BadgeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBadgeRow {
            id: Uuid::new_v4(),
            name: badge.name.as_ref(),
            description: &badge.description,
            points_threshold: to_db_points(badge.points_threshold),
        };

        let created = diesel::insert_into(badges::table)
            .values(&row)
            .returning(BadgeRow::as_returning())
            .get_result::<BadgeRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(row.name)))?;
        to_badge(created)
    }

    async fn update(
        &self,
        id: &BadgeId,
        update: &BadgeUpdate,
    ) -> Result<Badge, BadgeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BadgeChangeset {
            name: update.name.as_ref().map(AsRef::as_ref),
            description: update.description.as_deref(),
            points_threshold: update.points_threshold.map(to_db_points),
        };

        let updated = diesel::update(badges::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(BadgeRow::as_returning())
            .get_result::<BadgeRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, changes.name))?
            .ok_or_else(|| BadgeRepositoryError::not_found(*id))?;
        to_badge(updated)
    }

    async fn delete(&self, id: &BadgeId) -> Result<(), BadgeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(badges::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        if deleted == 0 {
            return Err(BadgeRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
