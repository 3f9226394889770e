//! Badge catalogue HTTP handlers.
//!
//! ```text
//! GET /api/v1/badges
//! GET /api/v1/badges?user_id=…
//! POST /api/v1/badges {"name":"Streaker","points_threshold":300}
//! PUT /api/v1/badges/{id}
//! DELETE /api/v1/badges/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::badge::points_threshold;
use crate::domain::{
    Badge, BadgeAward, BadgeId, BadgeName, BadgeUpdate, BadgeValidationError, Error, NewBadge,
    UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::completions::MessageResponse;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id, parse_optional_id,
};

const BADGE_ID: FieldName = FieldName::new("id");
const USER_ID: FieldName = FieldName::new("user_id");
const NAME: FieldName = FieldName::new("name");
const POINTS_THRESHOLD: FieldName = FieldName::new("points_threshold");

/// Catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BadgeResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "First Step")]
    pub name: String,
    pub description: String,
    pub points_threshold: u32,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            id: badge.id.to_string(),
            name: badge.name.to_string(),
            description: badge.description,
            points_threshold: badge.points_threshold,
        }
    }
}

/// A badge held by a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AwardedBadgeResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub points_threshold: u32,
    #[schema(format = "date-time")]
    pub awarded_date: String,
}

impl From<BadgeAward> for AwardedBadgeResponse {
    fn from(award: BadgeAward) -> Self {
        let BadgeAward {
            badge,
            awarded_date,
        } = award;
        Self {
            id: badge.id.to_string(),
            name: badge.name.to_string(),
            description: badge.description,
            points_threshold: badge.points_threshold,
            awarded_date: awarded_date.to_rfc3339(),
        }
    }
}

/// Body for creating or editing a badge. Omitted fields are left unchanged
/// on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BadgeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_threshold: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BadgeListParams {
    /// List this user's awards instead of the catalogue.
    pub user_id: Option<String>,
}

/// Either the catalogue or one user's awards.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BadgeListResponse {
    Catalogue(Vec<BadgeResponse>),
    Awards(Vec<AwardedBadgeResponse>),
}

fn map_badge_validation_error(err: BadgeValidationError) -> Error {
    match err {
        BadgeValidationError::EmptyName => invalid_field_error(NAME, "empty_name", err.to_string()),
        BadgeValidationError::NameTooLong { .. } => {
            invalid_field_error(NAME, "name_too_long", err.to_string())
        }
        BadgeValidationError::ThresholdOutOfRange { .. } => {
            invalid_field_error(POINTS_THRESHOLD, "threshold_out_of_range", err.to_string())
        }
    }
}

fn parse_new_badge(payload: BadgeRequest) -> Result<NewBadge, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error(NAME))?;
    let threshold = payload
        .points_threshold
        .ok_or_else(|| missing_field_error(POINTS_THRESHOLD))?;
    Ok(NewBadge {
        name: BadgeName::new(name).map_err(map_badge_validation_error)?,
        description: payload.description.unwrap_or_default(),
        points_threshold: points_threshold(threshold).map_err(map_badge_validation_error)?,
    })
}

fn parse_badge_update(payload: BadgeRequest) -> Result<BadgeUpdate, Error> {
    Ok(BadgeUpdate {
        name: payload
            .name
            .map(BadgeName::new)
            .transpose()
            .map_err(map_badge_validation_error)?,
        description: payload.description,
        points_threshold: payload
            .points_threshold
            .map(points_threshold)
            .transpose()
            .map_err(map_badge_validation_error)?,
    })
}

/// List the badge catalogue, or the awards of `user_id` when given.
#[utoipa::path(
    get,
    path = "/api/v1/badges",
    params(BadgeListParams),
    responses(
        (status = 200, description = "Badges or awards", body = BadgeListResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["badges"],
    operation_id = "listBadges"
)]
#[get("/badges")]
pub async fn list_badges(
    state: web::Data<HttpState>,
    query: web::Query<BadgeListParams>,
) -> ApiResult<web::Json<BadgeListResponse>> {
    let user_id = parse_optional_id(query.into_inner().user_id, USER_ID, UserId::new)?;
    let response = match user_id {
        Some(user_id) => BadgeListResponse::Awards(
            state
                .badges_query
                .list_awards_for_user(user_id)
                .await?
                .into_iter()
                .map(AwardedBadgeResponse::from)
                .collect(),
        ),
        None => BadgeListResponse::Catalogue(
            state
                .badges_query
                .list_badges()
                .await?
                .into_iter()
                .map(BadgeResponse::from)
                .collect(),
        ),
    };
    Ok(web::Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/badges",
    request_body = BadgeRequest,
    responses(
        (status = 201, description = "Badge created", body = BadgeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Badge name taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["badges"],
    operation_id = "createBadge"
)]
#[post("/badges")]
pub async fn create_badge(
    state: web::Data<HttpState>,
    payload: web::Json<BadgeRequest>,
) -> ApiResult<HttpResponse> {
    let badge = parse_new_badge(payload.into_inner())?;
    let created = state.badges.create_badge(badge).await?;
    Ok(HttpResponse::Created().json(BadgeResponse::from(created)))
}

/// Edit a badge. Threshold changes apply to future completions only.
#[utoipa::path(
    put,
    path = "/api/v1/badges/{id}",
    params(("id" = String, Path, description = "Badge identifier")),
    request_body = BadgeRequest,
    responses(
        (status = 200, description = "Badge updated", body = BadgeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Badge not found", body = ErrorResponse),
        (status = 409, description = "Badge name taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["badges"],
    operation_id = "updateBadge"
)]
#[put("/badges/{id}")]
pub async fn update_badge(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<BadgeRequest>,
) -> ApiResult<web::Json<BadgeResponse>> {
    let id = parse_id(path.into_inner(), BADGE_ID, BadgeId::new)?;
    let update = parse_badge_update(payload.into_inner())?;
    let badge = state.badges.update_badge(id, update).await?;
    Ok(web::Json(BadgeResponse::from(badge)))
}

/// Remove a badge together with every award of it.
#[utoipa::path(
    delete,
    path = "/api/v1/badges/{id}",
    params(("id" = String, Path, description = "Badge identifier")),
    responses(
        (status = 200, description = "Badge deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Badge not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["badges"],
    operation_id = "deleteBadge"
)]
#[delete("/badges/{id}")]
pub async fn delete_badge(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_id(path.into_inner(), BADGE_ID, BadgeId::new)?;
    state.badges.delete_badge(id).await?;
    Ok(web::Json(MessageResponse::new("Badge deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockBadgeCommand, MockBadgeQuery};
    use crate::inbound::http::test_utils::{MockPorts, call_json};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn badge(name: &str, threshold: u32) -> Badge {
        Badge {
            id: BadgeId::random(),
            name: BadgeName::new(name).expect("valid name"),
            description: format!("Reached {threshold} points"),
            points_threshold: threshold,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn catalogue_is_listed_without_a_user_filter() {
        let mut query = MockBadgeQuery::new();
        query
            .expect_list_badges()
            .times(1)
            .return_once(|| Ok(vec![badge("First Step", 10), badge("Dedicated", 100)]));
        let ports = MockPorts {
            badges_query: query,
            ..MockPorts::default()
        };

        let (status, body) =
            call_json(ports, TestRequest::get().uri("/api/v1/badges")).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|badge| badge.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, ["First Step", "Dedicated"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn awards_are_listed_for_a_user() {
        let user_id = UserId::random();
        let awarded_date = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut query = MockBadgeQuery::new();
        query
            .expect_list_awards_for_user()
            .withf(move |id| *id == user_id)
            .times(1)
            .return_once(move |_| {
                Ok(vec![BadgeAward {
                    badge: badge("First Step", 10),
                    awarded_date,
                }])
            });
        let ports = MockPorts {
            badges_query: query,
            ..MockPorts::default()
        };

        let uri = format!("/api/v1/badges?user_id={user_id}");
        let (status, body) = call_json(ports, TestRequest::get().uri(&uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body[0].get("awarded_date").and_then(Value::as_str),
            Some("2025-03-01T09:00:00+00:00")
        );
    }

    #[rstest]
    #[case(json!({"points_threshold": 5}), "name", "missing_field")]
    #[case(json!({"name": "Streaker"}), "points_threshold", "missing_field")]
    #[case(json!({"name": "  ", "points_threshold": 5}), "name", "empty_name")]
    #[case(
        json!({"name": "Streaker", "points_threshold": -1}),
        "points_threshold",
        "threshold_out_of_range"
    )]
    #[actix_web::test]
    async fn invalid_badges_are_rejected(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = call_json(
            MockPorts::default(),
            TestRequest::post().uri("/api/v1/badges").set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!(field));
        assert_eq!(body["details"]["code"], json!(code));
    }

    #[rstest]
    #[actix_web::test]
    async fn created_badges_return_201() {
        let mut command = MockBadgeCommand::new();
        command
            .expect_create_badge()
            .withf(|badge| badge.name.as_ref() == "Streaker" && badge.points_threshold == 300)
            .times(1)
            .returning(|new| {
                Ok(Badge {
                    id: BadgeId::random(),
                    name: new.name,
                    description: new.description,
                    points_threshold: new.points_threshold,
                })
            });
        let ports = MockPorts {
            badges: command,
            ..MockPorts::default()
        };

        let (status, body) = call_json(
            ports,
            TestRequest::post()
                .uri("/api/v1/badges")
                .set_json(json!({"name": "Streaker", "points_threshold": 300})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["description"], json!(""));
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_names_are_conflicts() {
        let mut command = MockBadgeCommand::new();
        command
            .expect_create_badge()
            .return_once(|_| Err(Error::conflict("badge name already exists")));
        let ports = MockPorts {
            badges: command,
            ..MockPorts::default()
        };

        let (status, body) = call_json(
            ports,
            TestRequest::post()
                .uri("/api/v1/badges")
                .set_json(json!({"name": "Legend", "points_threshold": 1000})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("conflict"));
    }

    #[rstest]
    #[actix_web::test]
    async fn partial_updates_only_carry_given_fields() {
        let id = BadgeId::random();
        let mut command = MockBadgeCommand::new();
        command
            .expect_update_badge()
            .withf(move |badge_id, update| {
                *badge_id == id
                    && update.name.is_none()
                    && update.description.is_none()
                    && update.points_threshold == Some(250)
            })
            .times(1)
            .return_once(|_, _| Ok(badge("Consistent", 250)));
        let ports = MockPorts {
            badges: command,
            ..MockPorts::default()
        };

        let (status, body) = call_json(
            ports,
            TestRequest::put()
                .uri(&format!("/api/v1/badges/{id}"))
                .set_json(json!({"points_threshold": 250})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["points_threshold"], json!(250));
    }
}
