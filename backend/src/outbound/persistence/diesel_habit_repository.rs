//! PostgreSQL-backed `HabitRepository` implementation using Diesel ORM.
//!
//! Retiring a habit reuses the completion rollback semantics: inside one
//! transaction each completion's stored `points_earned` is subtracted from its
//! owner before the completions and the habit are deleted. Owners are debited
//! once each, in ascending id order, so concurrent retirements lock users in
//! the same sequence.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{HabitRepository, HabitRepositoryError};
use crate::domain::{
    Habit, HabitId, HabitListing, HabitOverview, HabitRetirement, HabitUpdate, NewHabit, UserId,
};

use super::diesel_error_mapping::{HABITS_USER_FKEY, classify_diesel_error, pool_error_message};
use super::models::{HabitChangeset, HabitRow, NewHabitRow, to_db_points};
use super::pool::{DbPool, PoolError};
use super::schema::{completions, habits, users};

/// Diesel-backed habit repository.
#[derive(Clone)]
pub struct DieselHabitRepository {
    pool: DbPool,
}

impl DieselHabitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HabitRepositoryError {
    HabitRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, owner: Option<UserId>) -> HabitRepositoryError {
    let failure = classify_diesel_error(error);
    match owner {
        Some(user_id) if failure.violates(HABITS_USER_FKEY) => {
            HabitRepositoryError::owner_not_found(user_id)
        }
        _ if failure.is_connection() => HabitRepositoryError::connection(failure.message()),
        _ => HabitRepositoryError::query(failure.message()),
    }
}

fn to_habit(row: HabitRow) -> Result<Habit, HabitRepositoryError> {
    Habit::try_from(row).map_err(|err| HabitRepositoryError::query(err.to_string()))
}

/// Points to take back from each owner, keyed in ascending id order.
///
/// An owner's debit never exceeds their balance, which the schema keeps
/// within `i32`, so saturation only guards corrupt rows.
fn debits_by_owner(reverted: &[(Uuid, i32)]) -> BTreeMap<Uuid, i32> {
    let mut debits = BTreeMap::new();
    for (owner, points) in reverted {
        let debit: &mut i32 = debits.entry(*owner).or_default();
        *debit = debit.saturating_add(*points);
    }
    debits
}

#[async_trait]
impl HabitRepository for DieselHabitRepository {
    async fn create(&self, habit: &NewHabit) -> Result<Habit, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewHabitRow {
            id: Uuid::new_v4(),
            user_id: *habit.user_id.as_uuid(),
            name: habit.name.as_ref(),
            description: &habit.description,
            points_per_completion: to_db_points(habit.points_per_completion),
            reward_description: &habit.reward_description,
        };

        let created = diesel::insert_into(habits::table)
            .values(&row)
            .returning(HabitRow::as_returning())
            .get_result::<HabitRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(habit.user_id)))?;
        to_habit(created)
    }

    async fn find(&self, id: &HabitId) -> Result<Option<Habit>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        habits::table
            .find(*id.as_uuid())
            .select(HabitRow::as_select())
            .first::<HabitRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .map(to_habit)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<HabitListing>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        habits::table
            .inner_join(users::table)
            .select((HabitRow::as_select(), users::username))
            .order((habits::created_at.desc(), habits::id.asc()))
            .load::<(HabitRow, String)>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?
            .into_iter()
            .map(|(row, owner_username)| {
                Ok(HabitListing {
                    habit: to_habit(row)?,
                    owner_username,
                })
            })
            .collect()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<HabitOverview>, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *user_id.as_uuid();

        let exists = users::table
            .find(owner)
            .select(users::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        if exists.is_none() {
            return Err(HabitRepositoryError::owner_not_found(*user_id));
        }

        let rows = habits::table
            .filter(habits::user_id.eq(owner))
            .select(HabitRow::as_select())
            .order((habits::created_at.desc(), habits::id.asc()))
            .load::<HabitRow>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        let habit_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let stats: HashMap<Uuid, (i64, Option<DateTime<Utc>>)> = completions::table
            .filter(completions::habit_id.eq_any(&habit_ids))
            .group_by(completions::habit_id)
            .select((
                completions::habit_id,
                count_star(),
                max(completions::completion_date),
            ))
            .load::<(Uuid, i64, Option<DateTime<Utc>>)>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?
            .into_iter()
            .map(|(habit_id, count, last)| (habit_id, (count, last)))
            .collect();

        rows.into_iter()
            .map(|row| {
                let (count, last_completion) = stats.get(&row.id).copied().unwrap_or((0, None));
                Ok(HabitOverview {
                    habit: to_habit(row)?,
                    total_completions: u64::try_from(count).unwrap_or_default(),
                    last_completion,
                })
            })
            .collect()
    }

    async fn update(
        &self,
        id: &HabitId,
        update: &HabitUpdate,
    ) -> Result<Habit, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = HabitChangeset {
            name: update.name.as_ref().map(AsRef::as_ref),
            description: update.description.as_deref(),
            points_per_completion: update.points_per_completion.map(to_db_points),
            reward_description: update.reward_description.as_deref(),
        };

        let updated = diesel::update(habits::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(HabitRow::as_returning())
            .get_result::<HabitRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?
            .ok_or_else(|| HabitRepositoryError::not_found(*id))?;
        to_habit(updated)
    }

    async fn retire(&self, id: &HabitId) -> Result<HabitRetirement, HabitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let habit_id = *id;

        let retirement = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let locked = habits::table
                        .find(*habit_id.as_uuid())
                        .select(habits::id)
                        .for_update()
                        .get_result::<Uuid>(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let reverted: Vec<(Uuid, i32)> = diesel::delete(
                        completions::table.filter(completions::habit_id.eq(*habit_id.as_uuid())),
                    )
                    .returning((completions::user_id, completions::points_earned))
                    .get_results(conn)
                    .await?;

                    for (owner, debit) in debits_by_owner(&reverted) {
                        diesel::update(users::table.find(owner))
                            .set(users::total_points.eq(users::total_points - debit))
                            .execute(conn)
                            .await?;
                    }
                    let points_reverted: u64 = reverted
                        .iter()
                        .map(|(_, points)| u64::try_from(*points).unwrap_or_default())
                        .sum();

                    diesel::delete(habits::table.find(*habit_id.as_uuid()))
                        .execute(conn)
                        .await?;

                    Ok(Some(HabitRetirement {
                        habit_id,
                        completions_reverted: reverted.len() as u64,
                        points_reverted,
                    }))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        retirement.ok_or_else(|| HabitRepositoryError::not_found(habit_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn debits_are_summed_per_owner_in_id_order() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let reverted = [(high, 10), (low, 5), (high, 25), (low, 0)];

        let debits: Vec<(Uuid, i32)> = debits_by_owner(&reverted).into_iter().collect();

        assert_eq!(debits, vec![(low, 5), (high, 35)]);
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(err, HabitRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn unknown_failures_are_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound, Some(UserId::random()));
        assert!(matches!(err, HabitRepositoryError::Query { .. }));
    }
}
