//! Habit HTTP handlers.
//!
//! ```text
//! GET /api/v1/habits[?user_id=…]
//! POST /api/v1/habits {"user_id":"…","name":"Read","points_per_completion":15}
//! GET /api/v1/habits/{id}
//! PUT /api/v1/habits/{id}
//! DELETE /api/v1/habits/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::habit::points_per_completion;
use crate::domain::{
    Error, Habit, HabitId, HabitListing, HabitName, HabitOverview, HabitRetirement, HabitUpdate,
    HabitValidationError, NewHabit, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id, parse_optional_id,
    parse_required_id,
};

const HABIT_ID: FieldName = FieldName::new("id");
const USER_ID: FieldName = FieldName::new("user_id");
const NAME: FieldName = FieldName::new("name");
const POINTS: FieldName = FieldName::new("points_per_completion");

/// Habit as returned by every habit endpoint.
///
/// Listing fields are only present on the matching listing: the global list
/// carries `owner_username`, the per-user list carries completion stats.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HabitResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(example = "Read 20 pages")]
    pub name: String,
    pub description: String,
    pub points_per_completion: u32,
    pub reward_description: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_completions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub last_completion: Option<String>,
}

impl From<Habit> for HabitResponse {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id.to_string(),
            user_id: habit.user_id.to_string(),
            name: habit.name.to_string(),
            description: habit.description,
            points_per_completion: habit.points_per_completion,
            reward_description: habit.reward_description,
            created_at: habit.created_at.to_rfc3339(),
            owner_username: None,
            total_completions: None,
            last_completion: None,
        }
    }
}

impl From<HabitListing> for HabitResponse {
    fn from(listing: HabitListing) -> Self {
        Self {
            owner_username: Some(listing.owner_username),
            ..Self::from(listing.habit)
        }
    }
}

impl From<HabitOverview> for HabitResponse {
    fn from(overview: HabitOverview) -> Self {
        Self {
            total_completions: Some(overview.total_completions),
            last_completion: overview.last_completion.map(|date| date.to_rfc3339()),
            ..Self::from(overview.habit)
        }
    }
}

/// Body for creating or editing a habit. Omitted fields keep their current
/// value on update; `user_id` is ignored on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct HabitRequest {
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Defaults to 10 on create; must be between 0 and 10000.
    pub points_per_completion: Option<i64>,
    pub reward_description: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HabitListParams {
    /// Only this user's habits, with completion statistics.
    pub user_id: Option<String>,
}

/// Summary of a retired habit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HabitDeletedResponse {
    pub message: String,
    pub completions_reverted: u64,
    pub points_reverted: u64,
}

impl From<HabitRetirement> for HabitDeletedResponse {
    fn from(retirement: HabitRetirement) -> Self {
        Self {
            message: "Habit deleted successfully".to_owned(),
            completions_reverted: retirement.completions_reverted,
            points_reverted: retirement.points_reverted,
        }
    }
}

fn map_habit_validation_error(err: HabitValidationError) -> Error {
    match err {
        HabitValidationError::EmptyName => {
            invalid_field_error(NAME, "empty_name", err.to_string())
        }
        HabitValidationError::NameTooLong { .. } => {
            invalid_field_error(NAME, "name_too_long", err.to_string())
        }
        HabitValidationError::PointsOutOfRange { .. } => {
            invalid_field_error(POINTS, "points_out_of_range", err.to_string())
        }
    }
}

fn parse_points(raw: Option<i64>) -> Result<Option<u32>, Error> {
    raw.map(points_per_completion)
        .transpose()
        .map_err(map_habit_validation_error)
}

fn parse_new_habit(payload: HabitRequest) -> Result<NewHabit, Error> {
    let user_id = parse_required_id(payload.user_id, USER_ID, UserId::new)?;
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let name = HabitName::new(name).map_err(map_habit_validation_error)?;

    let mut habit = NewHabit::new(user_id, name);
    if let Some(description) = payload.description {
        habit = habit.with_description(description);
    }
    if let Some(points) = parse_points(payload.points_per_completion)? {
        habit = habit.with_points_per_completion(points);
    }
    if let Some(reward) = payload.reward_description {
        habit = habit.with_reward_description(reward);
    }
    Ok(habit)
}

fn parse_habit_update(payload: HabitRequest) -> Result<HabitUpdate, Error> {
    Ok(HabitUpdate {
        name: payload
            .name
            .map(HabitName::new)
            .transpose()
            .map_err(map_habit_validation_error)?,
        description: payload.description,
        points_per_completion: parse_points(payload.points_per_completion)?,
        reward_description: payload.reward_description,
    })
}

/// List every habit newest first, or one user's habits with statistics.
#[utoipa::path(
    get,
    path = "/api/v1/habits",
    params(HabitListParams),
    responses(
        (status = 200, description = "Habits", body = [HabitResponse]),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["habits"],
    operation_id = "listHabits"
)]
#[get("/habits")]
pub async fn list_habits(
    state: web::Data<HttpState>,
    query: web::Query<HabitListParams>,
) -> ApiResult<web::Json<Vec<HabitResponse>>> {
    let habits = match parse_optional_id(query.into_inner().user_id, USER_ID, UserId::new)? {
        Some(user_id) => state
            .habits_query
            .list_habits_for_user(user_id)
            .await?
            .into_iter()
            .map(HabitResponse::from)
            .collect(),
        None => state
            .habits_query
            .list_habits()
            .await?
            .into_iter()
            .map(HabitResponse::from)
            .collect(),
    };
    Ok(web::Json(habits))
}

#[utoipa::path(
    post,
    path = "/api/v1/habits",
    request_body = HabitRequest,
    responses(
        (status = 201, description = "Habit created", body = HabitResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["habits"],
    operation_id = "createHabit"
)]
#[post("/habits")]
pub async fn create_habit(
    state: web::Data<HttpState>,
    payload: web::Json<HabitRequest>,
) -> ApiResult<HttpResponse> {
    let habit = parse_new_habit(payload.into_inner())?;
    let created = state.habits.create_habit(habit).await?;
    Ok(HttpResponse::Created().json(HabitResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/habits/{id}",
    params(("id" = String, Path, description = "Habit identifier")),
    responses(
        (status = 200, description = "Habit", body = HabitResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Habit not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["habits"],
    operation_id = "getHabit"
)]
#[get("/habits/{id}")]
pub async fn get_habit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<HabitResponse>> {
    let id = parse_id(path.into_inner(), HABIT_ID, HabitId::new)?;
    let habit = state.habits_query.get_habit(id).await?;
    Ok(web::Json(HabitResponse::from(habit)))
}

/// Edit a habit. Completions already recorded keep their points.
#[utoipa::path(
    put,
    path = "/api/v1/habits/{id}",
    params(("id" = String, Path, description = "Habit identifier")),
    request_body = HabitRequest,
    responses(
        (status = 200, description = "Habit updated", body = HabitResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Habit not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["habits"],
    operation_id = "updateHabit"
)]
#[put("/habits/{id}")]
pub async fn update_habit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<HabitRequest>,
) -> ApiResult<web::Json<HabitResponse>> {
    let id = parse_id(path.into_inner(), HABIT_ID, HabitId::new)?;
    let update = parse_habit_update(payload.into_inner())?;
    let habit = state.habits.update_habit(id, update).await?;
    Ok(web::Json(HabitResponse::from(habit)))
}

/// Retire a habit, reverting the points of every completion of it.
#[utoipa::path(
    delete,
    path = "/api/v1/habits/{id}",
    params(("id" = String, Path, description = "Habit identifier")),
    responses(
        (status = 200, description = "Habit deleted", body = HabitDeletedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Habit not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["habits"],
    operation_id = "deleteHabit"
)]
#[delete("/habits/{id}")]
pub async fn delete_habit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<HabitDeletedResponse>> {
    let id = parse_id(path.into_inner(), HABIT_ID, HabitId::new)?;
    let retirement = state.habits.delete_habit(id).await?;
    Ok(web::Json(HabitDeletedResponse::from(retirement)))
}

#[cfg(test)]
#[path = "habits_tests.rs"]
mod tests;
