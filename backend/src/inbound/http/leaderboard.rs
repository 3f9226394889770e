//! Leaderboard HTTP handler.
//!
//! ```text
//! GET /api/v1/leaderboard?search=ad&order_by=badges_count&order_dir=asc&limit=10
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Leaderboard, LeaderboardEntry, LeaderboardOrder, LeaderboardRequest, SortDirection,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::badges::AwardedBadgeResponse;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::schemas::{LeaderboardOrderSchema, SortDirectionSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_lenient_integer;

/// Leaderboard query string. Unknown orderings fall back to the defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// Case-insensitive substring of the username.
    pub search: Option<String>,
    /// `points` (default), `username`, or `badges_count`.
    pub order_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order_dir: Option<String>,
    /// Page size; defaults to 50 and is clamped to 1..=100. Only the
    /// leading digits are read, so a non-numeric value becomes 1.
    pub limit: Option<String>,
}

/// One ranked user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntryResponse {
    /// One-based rank within this page.
    pub position: u32,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub username: String,
    pub points: u32,
    pub badges_count: u64,
    pub completions_count: u64,
    pub badges: Vec<AwardedBadgeResponse>,
}

impl From<LeaderboardEntry> for LeaderboardEntryResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        let badges_count = entry.standing.badges_count();
        let standing = entry.standing;
        Self {
            position: entry.position,
            user_id: standing.user_id.to_string(),
            username: standing.username,
            points: standing.points,
            badges_count,
            completions_count: standing.completions_count,
            badges: standing
                .badges
                .into_iter()
                .map(AwardedBadgeResponse::from)
                .collect(),
        }
    }
}

/// The filters that produced a page, after defaults and clamping.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardFiltersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[schema(value_type = LeaderboardOrderSchema)]
    pub order_by: String,
    #[schema(value_type = SortDirectionSchema)]
    pub order_dir: String,
    pub limit: u32,
}

impl From<&LeaderboardRequest> for LeaderboardFiltersResponse {
    fn from(request: &LeaderboardRequest) -> Self {
        Self {
            search: request.search().map(str::to_owned),
            order_by: request.order_by().as_str().to_owned(),
            order_dir: request.direction().as_str().to_owned(),
            limit: request.limit(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntryResponse>,
    pub filters: LeaderboardFiltersResponse,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(board: Leaderboard) -> Self {
        Self {
            filters: LeaderboardFiltersResponse::from(&board.request),
            leaderboard: board
                .entries
                .into_iter()
                .map(LeaderboardEntryResponse::from)
                .collect(),
        }
    }
}

/// Ranked standings. Ties fall back to username, then user id.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["leaderboard"],
    operation_id = "leaderboard"
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
    query: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<LeaderboardResponse>> {
    let params = query.into_inner();
    let limit = parse_lenient_integer(params.limit.as_deref());
    let request = LeaderboardRequest::new(
        params.search.as_deref(),
        LeaderboardOrder::parse_lenient(params.order_by.as_deref()),
        SortDirection::parse_lenient(params.order_dir.as_deref()),
        limit,
    );
    let board = state.leaderboard.leaderboard(request).await?;
    Ok(web::Json(LeaderboardResponse::from(board)))
}
