//! User HTTP handlers.
//!
//! ```text
//! GET /api/v1/users
//! POST /api/v1/users {"username":"ada","email":"ada@example.com"}
//! GET /api/v1/users/{id}
//! PUT /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    EmailAddress, Error, NewUser, User, UserId, UserProfile, UserUpdate, UserValidationError,
    Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::badges::AwardedBadgeResponse;
use crate::inbound::http::completions::MessageResponse;
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_id,
};

const USER_ID: FieldName = FieldName::new("id");
const USERNAME: FieldName = FieldName::new("username");
const EMAIL: FieldName = FieldName::new("email");

/// Registered user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "ada_lovelace")]
    pub username: String,
    #[schema(format = "email")]
    pub email: String,
    pub total_points: u32,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            total_points: user.total_points,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// User profile with held badges, newest award first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub badges: Vec<AwardedBadgeResponse>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: UserResponse::from(profile.user),
            badges: profile
                .badges
                .into_iter()
                .map(AwardedBadgeResponse::from)
                .collect(),
        }
    }
}

/// Body for registering or editing a user. Omitted fields are left
/// unchanged on update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match err {
        UserValidationError::EmptyUsername => (USERNAME, "empty_username"),
        UserValidationError::UsernameTooShort { .. } => (USERNAME, "username_too_short"),
        UserValidationError::UsernameTooLong { .. } => (USERNAME, "username_too_long"),
        UserValidationError::UsernameInvalidCharacters => {
            (USERNAME, "username_invalid_characters")
        }
        UserValidationError::EmptyEmail => (EMAIL, "empty_email"),
        UserValidationError::InvalidEmail => (EMAIL, "invalid_email"),
    };
    invalid_field_error(field, code, err.to_string())
}

fn parse_new_user(payload: UserRequest) -> Result<NewUser, Error> {
    let username = payload
        .username
        .ok_or_else(|| missing_field_error(USERNAME))?;
    let email = payload.email.ok_or_else(|| missing_field_error(EMAIL))?;
    Ok(NewUser {
        username: Username::new(username).map_err(map_user_validation_error)?,
        email: EmailAddress::new(email).map_err(map_user_validation_error)?,
    })
}

fn parse_user_update(payload: UserRequest) -> Result<UserUpdate, Error> {
    Ok(UserUpdate {
        username: payload
            .username
            .map(Username::new)
            .transpose()
            .map_err(map_user_validation_error)?,
        email: payload
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(map_user_validation_error)?,
    })
}

/// List users, highest points first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Register a user starting at zero points.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = parse_new_user(payload.into_inner())?;
    let created = state.users.register_user(user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User profile", body = UserProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfileResponse>> {
    let id = parse_id(path.into_inner(), USER_ID, UserId::new)?;
    let profile = state.users_query.get_user_profile(id).await?;
    Ok(web::Json(UserProfileResponse::from(profile)))
}

/// Change a username or email. Points cannot be edited here.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_id(path.into_inner(), USER_ID, UserId::new)?;
    let update = parse_user_update(payload.into_inner())?;
    let user = state.users.update_user(id, update).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete a user together with their habits, completions, and awards.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_id(path.into_inner(), USER_ID, UserId::new)?;
    state.users.delete_user(id).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}
