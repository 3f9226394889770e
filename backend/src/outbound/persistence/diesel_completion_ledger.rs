//! PostgreSQL-backed `CompletionLedger` implementation using Diesel ORM.
//!
//! Record and revert each run inside one `diesel-async` transaction. The
//! transaction commits only when the scoped future returns `Ok`; every other
//! exit, including an early `?`, rolls back. Point totals are adjusted with
//! in-place `total_points = total_points +/- n` updates and awards are
//! inserted with `ON CONFLICT DO NOTHING` so racing completions cannot
//! duplicate a badge.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CompletionLedger, CompletionLedgerError};
use crate::domain::{
    Badge, BadgeId, Completion, CompletionEntry, CompletionFilter, CompletionId, HabitId,
    RecordedCompletion, RevertedCompletion, UserId, newly_earned_badges,
};

use super::diesel_error_mapping::{
    COMPLETIONS_HABIT_FKEY, COMPLETIONS_USER_FKEY, StoreFailure, classify_diesel_error,
    pool_error_message,
};
use super::models::{
    BadgeRow, CompletionRow, NewCompletionRow, NewUserBadgeRow, RowConversionError, non_negative,
};
use super::pool::{DbPool, PoolError};
use super::schema::{badges, completions, habits, user_badges, users};

/// Diesel-backed implementation of the completion award transaction.
#[derive(Clone)]
pub struct DieselCompletionLedger {
    pool: DbPool,
}

impl DieselCompletionLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure raised inside a ledger transaction.
///
/// Returning any variant from the transaction closure rolls it back.
#[derive(Debug)]
enum LedgerFailure {
    Diesel(diesel::result::Error),
    HabitNotFound(HabitId),
    UserNotFound(UserId),
    CompletionNotFound(CompletionId),
    InvalidRow(RowConversionError),
}

impl From<diesel::result::Error> for LedgerFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<RowConversionError> for LedgerFailure {
    fn from(error: RowConversionError) -> Self {
        Self::InvalidRow(error)
    }
}

fn map_pool_error(error: PoolError) -> CompletionLedgerError {
    CompletionLedgerError::connection(pool_error_message(error))
}

fn map_store_failure(
    failure: StoreFailure,
    habit_id: Option<HabitId>,
    user_id: Option<UserId>,
) -> CompletionLedgerError {
    match (habit_id, user_id) {
        (Some(habit_id), _) if failure.violates(COMPLETIONS_HABIT_FKEY) => {
            CompletionLedgerError::habit_not_found(habit_id)
        }
        (_, Some(user_id)) if failure.violates(COMPLETIONS_USER_FKEY) => {
            CompletionLedgerError::user_not_found(user_id)
        }
        _ if failure.is_connection() => CompletionLedgerError::connection(failure.message()),
        _ => CompletionLedgerError::query(failure.message()),
    }
}

impl LedgerFailure {
    /// Map onto the port error; the ids let FK violations name the missing row.
    fn into_port_error(
        self,
        habit_id: Option<HabitId>,
        user_id: Option<UserId>,
    ) -> CompletionLedgerError {
        match self {
            Self::Diesel(error) => {
                map_store_failure(classify_diesel_error(error), habit_id, user_id)
            }
            Self::HabitNotFound(id) => CompletionLedgerError::habit_not_found(id),
            Self::UserNotFound(id) => CompletionLedgerError::user_not_found(id),
            Self::CompletionNotFound(id) => CompletionLedgerError::completion_not_found(id),
            Self::InvalidRow(error) => CompletionLedgerError::query(error.to_string()),
        }
    }
}

/// Insert awards for every newly earned badge and return the ones this
/// transaction actually wrote.
async fn award_badges(
    conn: &mut AsyncPgConnection,
    user_id: UserId,
    total_points: u32,
) -> Result<Vec<Badge>, LedgerFailure> {
    let held: HashSet<BadgeId> = user_badges::table
        .filter(user_badges::user_id.eq(*user_id.as_uuid()))
        .select(user_badges::badge_id)
        .load::<Uuid>(conn)
        .await?
        .into_iter()
        .map(BadgeId::from_uuid)
        .collect();

    let catalogue = badges::table
        .select(BadgeRow::as_select())
        .load::<BadgeRow>(conn)
        .await?
        .into_iter()
        .map(Badge::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let earned = newly_earned_badges(total_points, &held, &catalogue);
    if earned.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<NewUserBadgeRow> = earned
        .iter()
        .map(|badge| NewUserBadgeRow {
            user_id: *user_id.as_uuid(),
            badge_id: *badge.id.as_uuid(),
        })
        .collect();
    let inserted: HashSet<Uuid> = diesel::insert_into(user_badges::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .returning(user_badges::badge_id)
        .get_results::<Uuid>(conn)
        .await?
        .into_iter()
        .collect();

    Ok(earned
        .into_iter()
        .filter(|badge| inserted.contains(badge.id.as_uuid()))
        .cloned()
        .collect())
}

#[async_trait]
impl CompletionLedger for DieselCompletionLedger {
    async fn record(
        &self,
        habit_id: HabitId,
        user_id: UserId,
    ) -> Result<RecordedCompletion, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, LedgerFailure, _>(|conn| {
            async move {
                // Lock the habit so a concurrent delete waits for this unit.
                let points_earned: i32 = habits::table
                    .find(*habit_id.as_uuid())
                    .select(habits::points_per_completion)
                    .for_share()
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or(LedgerFailure::HabitNotFound(habit_id))?;

                let row: CompletionRow = diesel::insert_into(completions::table)
                    .values(&NewCompletionRow {
                        id: Uuid::new_v4(),
                        habit_id: *habit_id.as_uuid(),
                        user_id: *user_id.as_uuid(),
                        points_earned,
                    })
                    .returning(CompletionRow::as_returning())
                    .get_result(conn)
                    .await?;

                let total: i32 = diesel::update(users::table.find(*user_id.as_uuid()))
                    .set(users::total_points.eq(users::total_points + points_earned))
                    .returning(users::total_points)
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or(LedgerFailure::UserNotFound(user_id))?;
                let total_points = non_negative(total, "total_points")?;

                let awarded_badges = award_badges(conn, user_id, total_points).await?;

                Ok(RecordedCompletion {
                    completion: Completion::try_from(row)?,
                    total_points,
                    awarded_badges,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| failure.into_port_error(Some(habit_id), Some(user_id)))
    }

    async fn revert(
        &self,
        completion_id: CompletionId,
    ) -> Result<RevertedCompletion, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, LedgerFailure, _>(|conn| {
            async move {
                let row: CompletionRow = completions::table
                    .find(*completion_id.as_uuid())
                    .select(CompletionRow::as_select())
                    .for_update()
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or(LedgerFailure::CompletionNotFound(completion_id))?;

                diesel::delete(completions::table.find(row.id))
                    .execute(conn)
                    .await?;

                let user_id = UserId::from_uuid(row.user_id);
                let total: i32 = diesel::update(users::table.find(row.user_id))
                    .set(users::total_points.eq(users::total_points - row.points_earned))
                    .returning(users::total_points)
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or(LedgerFailure::UserNotFound(user_id))?;

                Ok(RevertedCompletion {
                    completion_id,
                    user_id,
                    points_reverted: non_negative(row.points_earned, "points_earned")?,
                    total_points: non_negative(total, "total_points")?,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| failure.into_port_error(None, None))
    }

    async fn list(
        &self,
        filter: CompletionFilter,
    ) -> Result<Vec<CompletionEntry>, CompletionLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = completions::table
            .inner_join(habits::table.on(habits::id.eq(completions::habit_id)))
            .inner_join(users::table.on(users::id.eq(completions::user_id)))
            .select((CompletionRow::as_select(), habits::name, users::username))
            .order((completions::completion_date.desc(), completions::id.asc()))
            .into_boxed();
        match filter {
            CompletionFilter::All => {}
            CompletionFilter::ByUser(user_id) => {
                query = query.filter(completions::user_id.eq(*user_id.as_uuid()));
            }
            CompletionFilter::ByHabit(habit_id) => {
                query = query.filter(completions::habit_id.eq(*habit_id.as_uuid()));
            }
        }

        let rows: Vec<(CompletionRow, String, String)> = query
            .load(&mut conn)
            .await
            .map_err(|error| map_store_failure(classify_diesel_error(error), None, None))?;
        debug!(count = rows.len(), ?filter, "loaded completions");

        rows.into_iter()
            .map(|(row, habit_name, username)| {
                Ok(CompletionEntry {
                    completion: Completion::try_from(row)
                        .map_err(|err| CompletionLedgerError::query(err.to_string()))?,
                    habit_name,
                    username,
                })
            })
            .collect()
    }
}
