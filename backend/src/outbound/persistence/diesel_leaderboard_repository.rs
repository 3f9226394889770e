//! PostgreSQL-backed `LeaderboardRepository` implementation using Diesel ORM.
//!
//! The user query orders and limits in SQL, so only one page of users is
//! loaded. Completion counts and awards are then fetched for that page alone;
//! positions are assigned in the domain.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, sql};
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{LeaderboardRepository, LeaderboardRepositoryError};
use crate::domain::{
    Badge, BadgeAward, LeaderboardOrder, LeaderboardRequest, LeaderboardStanding, SortDirection,
    UserId,
};

use super::diesel_error_mapping::{classify_diesel_error, pool_error_message};
use super::models::{BadgeRow, UserRow, non_negative};
use super::pool::{DbPool, PoolError};
use super::schema::{badges, completions, user_badges, users};

/// Diesel-backed leaderboard source.
#[derive(Clone)]
pub struct DieselLeaderboardRepository {
    pool: DbPool,
}

impl DieselLeaderboardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LeaderboardRepositoryError {
    LeaderboardRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> LeaderboardRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.is_connection() {
        LeaderboardRepositoryError::connection(failure.message())
    } else {
        LeaderboardRepositoryError::query(failure.message())
    }
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Number of badges held by the user on the current `users` row.
fn badges_held() -> SqlLiteral<BigInt> {
    sql::<BigInt>("(SELECT COUNT(*) FROM user_badges WHERE user_badges.user_id = users.id)")
}

#[async_trait]
impl LeaderboardRepository for DieselLeaderboardRepository {
    async fn standings(
        &self,
        request: &LeaderboardRequest,
    ) -> Result<Vec<LeaderboardStanding>, LeaderboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut user_query = users::table.select(UserRow::as_select()).into_boxed();
        if let Some(term) = request.search() {
            user_query = user_query.filter(users::username.ilike(like_pattern(term)));
        }
        user_query = match (request.order_by(), request.direction()) {
            (LeaderboardOrder::Points, SortDirection::Desc) => {
                user_query.order_by(users::total_points.desc())
            }
            (LeaderboardOrder::Points, SortDirection::Asc) => {
                user_query.order_by(users::total_points.asc())
            }
            (LeaderboardOrder::Username, SortDirection::Desc) => {
                user_query.order_by(users::username.desc())
            }
            (LeaderboardOrder::Username, SortDirection::Asc) => {
                user_query.order_by(users::username.asc())
            }
            (LeaderboardOrder::BadgesCount, SortDirection::Desc) => {
                user_query.order_by(badges_held().desc())
            }
            (LeaderboardOrder::BadgesCount, SortDirection::Asc) => {
                user_query.order_by(badges_held().asc())
            }
        };
        let user_rows: Vec<UserRow> = user_query
            .then_order_by((users::username.asc(), users::id.asc()))
            .limit(i64::from(request.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if user_rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = user_rows.iter().map(|row| row.id).collect();

        let completion_counts: HashMap<Uuid, i64> = completions::table
            .filter(completions::user_id.eq_any(&ids))
            .group_by(completions::user_id)
            .select((completions::user_id, count_star()))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        let mut awards: HashMap<Uuid, Vec<BadgeAward>> = HashMap::new();
        let award_rows = user_badges::table
            .inner_join(badges::table)
            .filter(user_badges::user_id.eq_any(&ids))
            .order((user_badges::awarded_date.desc(), badges::name.asc()))
            .select((
                user_badges::user_id,
                BadgeRow::as_select(),
                user_badges::awarded_date,
            ))
            .load::<(Uuid, BadgeRow, DateTime<Utc>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        for (user_id, row, awarded_date) in award_rows {
            let badge = Badge::try_from(row)
                .map_err(|err| LeaderboardRepositoryError::query(err.to_string()))?;
            awards.entry(user_id).or_default().push(BadgeAward {
                badge,
                awarded_date,
            });
        }

        user_rows
            .into_iter()
            .map(|row| {
                let points = non_negative(row.total_points, "total_points")
                    .map_err(|err| LeaderboardRepositoryError::query(err.to_string()))?;
                let completions_count = completion_counts.get(&row.id).copied().unwrap_or(0);
                Ok(LeaderboardStanding {
                    user_id: UserId::from_uuid(row.id),
                    points,
                    completions_count: u64::try_from(completions_count).unwrap_or_default(),
                    badges: awards.remove(&row.id).unwrap_or_default(),
                    username: row.username,
                })
            })
            .collect()
    }
}
