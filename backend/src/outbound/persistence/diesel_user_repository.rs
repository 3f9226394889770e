//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Badge, BadgeAward, NewUser, User, UserId, UserProfile, UserUpdate};

use super::diesel_error_mapping::{
    USERS_EMAIL_KEY, USERS_USERNAME_KEY, classify_diesel_error, pool_error_message,
};
use super::models::{BadgeRow, NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{badges, user_badges, users};

/// Diesel-backed user repository.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

/// Map Diesel errors, naming the duplicated value for unique violations.
fn map_diesel_error(
    error: diesel::result::Error,
    username: Option<&str>,
    email: Option<&str>,
) -> UserRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.violates(USERS_USERNAME_KEY) {
        return UserRepositoryError::duplicate_username(username.unwrap_or_default());
    }
    if failure.violates(USERS_EMAIL_KEY) {
        return UserRepositoryError::duplicate_email(email.unwrap_or_default());
    }
    if failure.is_connection() {
        UserRepositoryError::connection(failure.message())
    } else {
        UserRepositoryError::query(failure.message())
    }
}

fn to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(|err| UserRepositoryError::query(err.to_string()))
}

fn to_award(
    (row, awarded_date): (BadgeRow, DateTime<Utc>),
) -> Result<BadgeAward, UserRepositoryError> {
    let badge = Badge::try_from(row).map_err(|err| UserRepositoryError::query(err.to_string()))?;
    Ok(BadgeAward {
        badge,
        awarded_date,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            username: user.username.as_ref(),
            email: user.email.as_ref(),
        };

        let created: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(row.username), Some(row.email)))?;
        to_user(created)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .select(UserRow::as_select())
            .order((
                users::total_points.desc(),
                users::username.asc(),
                users::id.asc(),
            ))
            .load::<UserRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None, None))?
            .into_iter()
            .map(to_user)
            .collect()
    }

    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None, None))?
        else {
            return Ok(None);
        };

        let badges = user_badges::table
            .inner_join(badges::table)
            .filter(user_badges::user_id.eq(*id.as_uuid()))
            .order((user_badges::awarded_date.desc(), badges::name.asc()))
            .select((BadgeRow::as_select(), user_badges::awarded_date))
            .load::<(BadgeRow, DateTime<Utc>)>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None, None))?
            .into_iter()
            .map(to_award)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(UserProfile {
            user: to_user(row)?,
            badges,
        }))
    }

    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserChangeset {
            username: update.username.as_ref().map(AsRef::as_ref),
            email: update.email.as_ref().map(AsRef::as_ref),
        };

        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, changes.username, changes.email))?
            .ok_or_else(|| UserRepositoryError::not_found(*id))?;
        to_user(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None, None))?;
        if deleted == 0 {
            return Err(UserRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
