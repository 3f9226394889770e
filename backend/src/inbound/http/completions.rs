//! Completion HTTP handlers: the points and badge award transaction.
//!
//! ```text
//! POST /api/v1/completions {"habit_id":"…","user_id":"…"}
//! DELETE /api/v1/completions/{id}
//! GET /api/v1/completions?user_id=…
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CompletionEntry, CompletionFilter, CompletionId, Error, HabitId, RecordedCompletion, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::badges::BadgeResponse;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, conflicting_filters_error, parse_id, parse_optional_id, parse_required_id,
};

/// Confirmation attached to a recorded completion.
pub const COMPLETION_RECORDED_MESSAGE: &str = "Habit completed successfully!";
/// Confirmation attached to a deleted completion.
pub const COMPLETION_DELETED_MESSAGE: &str = "Completion deleted successfully";

const HABIT_ID: FieldName = FieldName::new("habit_id");
const USER_ID: FieldName = FieldName::new("user_id");
const COMPLETION_ID: FieldName = FieldName::new("id");

/// Request payload for `POST /api/v1/completions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CompletionRequest {
    #[schema(format = "uuid")]
    pub habit_id: Option<String>,
    #[schema(format = "uuid")]
    pub user_id: Option<String>,
}

/// Outcome of a committed completion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletionRecordedResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub points_earned: u32,
    /// The user's total after this completion.
    pub total_points: u32,
    /// Badges unlocked by this completion, ascending by threshold.
    pub awarded_badges: Vec<BadgeResponse>,
    #[schema(example = "Habit completed successfully!")]
    pub message: String,
}

impl From<RecordedCompletion> for CompletionRecordedResponse {
    fn from(recorded: RecordedCompletion) -> Self {
        Self {
            id: recorded.completion.id.to_string(),
            points_earned: recorded.completion.points_earned,
            total_points: recorded.total_points,
            awarded_badges: recorded
                .awarded_badges
                .into_iter()
                .map(BadgeResponse::from)
                .collect(),
            message: COMPLETION_RECORDED_MESSAGE.to_owned(),
        }
    }
}

/// Plain confirmation body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query filters for `GET /api/v1/completions`; at most one may be set.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompletionListParams {
    /// Only completions logged by this user.
    pub user_id: Option<String>,
    /// Only completions of this habit.
    pub habit_id: Option<String>,
}

/// A completion history row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletionEntryResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub habit_id: String,
    pub habit_name: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub username: String,
    #[schema(format = "date-time")]
    pub completion_date: String,
    pub points_earned: u32,
}

impl From<CompletionEntry> for CompletionEntryResponse {
    fn from(entry: CompletionEntry) -> Self {
        let CompletionEntry {
            completion,
            habit_name,
            username,
        } = entry;
        Self {
            id: completion.id.to_string(),
            habit_id: completion.habit_id.to_string(),
            habit_name,
            user_id: completion.user_id.to_string(),
            username,
            completion_date: completion.completion_date.to_rfc3339(),
            points_earned: completion.points_earned,
        }
    }
}

fn parse_filter(params: CompletionListParams) -> Result<CompletionFilter, Error> {
    let user_id = parse_optional_id(params.user_id, USER_ID, UserId::new)?;
    let habit_id = parse_optional_id(params.habit_id, HABIT_ID, HabitId::new)?;
    match (user_id, habit_id) {
        (Some(_), Some(_)) => Err(conflicting_filters_error(&[USER_ID, HABIT_ID])),
        (Some(user_id), None) => Ok(CompletionFilter::ByUser(user_id)),
        (None, Some(habit_id)) => Ok(CompletionFilter::ByHabit(habit_id)),
        (None, None) => Ok(CompletionFilter::All),
    }
}

/// Record a habit completion, credit its points, and award badges.
///
/// All three steps commit together or not at all.
#[utoipa::path(
    post,
    path = "/api/v1/completions",
    request_body = CompletionRequest,
    responses(
        (status = 201, description = "Completion recorded", body = CompletionRecordedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Habit or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["completions"],
    operation_id = "recordCompletion"
)]
#[post("/completions")]
pub async fn record_completion(
    state: web::Data<HttpState>,
    payload: web::Json<CompletionRequest>,
) -> ApiResult<HttpResponse> {
    let CompletionRequest { habit_id, user_id } = payload.into_inner();
    let habit_id = parse_required_id(habit_id, HABIT_ID, HabitId::new)?;
    let user_id = parse_required_id(user_id, USER_ID, UserId::new)?;

    let recorded = state.completions.record_completion(habit_id, user_id).await?;
    Ok(HttpResponse::Created().json(CompletionRecordedResponse::from(recorded)))
}

/// Delete a completion and roll its points back. Awarded badges are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/completions/{id}",
    params(("id" = String, Path, description = "Completion identifier")),
    responses(
        (status = 200, description = "Completion deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Completion not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["completions"],
    operation_id = "deleteCompletion"
)]
#[delete("/completions/{id}")]
pub async fn delete_completion(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let completion_id = parse_id(path.into_inner(), COMPLETION_ID, CompletionId::new)?;
    state.completions.delete_completion(completion_id).await?;
    Ok(web::Json(MessageResponse::new(COMPLETION_DELETED_MESSAGE)))
}

/// List completions newest first, optionally for one user or one habit.
#[utoipa::path(
    get,
    path = "/api/v1/completions",
    params(CompletionListParams),
    responses(
        (status = 200, description = "Completions", body = [CompletionEntryResponse]),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["completions"],
    operation_id = "listCompletions"
)]
#[get("/completions")]
pub async fn list_completions(
    state: web::Data<HttpState>,
    query: web::Query<CompletionListParams>,
) -> ApiResult<web::Json<Vec<CompletionEntryResponse>>> {
    let filter = parse_filter(query.into_inner())?;
    let entries = state.completions_query.list_completions(filter).await?;
    Ok(web::Json(
        entries
            .into_iter()
            .map(CompletionEntryResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
#[path = "completions_tests.rs"]
mod tests;
