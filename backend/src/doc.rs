//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response DTOs plus the domain enum wrappers
//!   ([`ErrorCodeSchema`], [`LeaderboardOrderSchema`],
//!   [`SortDirectionSchema`]) that keep utoipa out of the domain
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::badges::{
    AwardedBadgeResponse, BadgeListResponse, BadgeRequest, BadgeResponse,
};
use crate::inbound::http::completions::{
    CompletionEntryResponse, CompletionRecordedResponse, CompletionRequest, MessageResponse,
};
use crate::inbound::http::error::ErrorResponse;
use crate::inbound::http::habits::{HabitDeletedResponse, HabitRequest, HabitResponse};
use crate::inbound::http::leaderboard::{
    LeaderboardEntryResponse, LeaderboardFiltersResponse, LeaderboardResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, LeaderboardOrderSchema, SortDirectionSchema};
use crate::inbound::http::users::{UserProfileResponse, UserRequest, UserResponse};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Habit tracker backend API",
        description = "Users, habits, completions with points and badges, and the leaderboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::completions::record_completion,
        crate::inbound::http::completions::delete_completion,
        crate::inbound::http::completions::list_completions,
        crate::inbound::http::habits::list_habits,
        crate::inbound::http::habits::create_habit,
        crate::inbound::http::habits::get_habit,
        crate::inbound::http::habits::update_habit,
        crate::inbound::http::habits::delete_habit,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::badges::list_badges,
        crate::inbound::http::badges::create_badge,
        crate::inbound::http::badges::update_badge,
        crate::inbound::http::badges::delete_badge,
        crate::inbound::http::leaderboard::leaderboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorResponse,
        ErrorCodeSchema,
        LeaderboardOrderSchema,
        SortDirectionSchema,
        CompletionRequest,
        CompletionRecordedResponse,
        CompletionEntryResponse,
        MessageResponse,
        HabitRequest,
        HabitResponse,
        HabitDeletedResponse,
        UserRequest,
        UserResponse,
        UserProfileResponse,
        BadgeRequest,
        BadgeResponse,
        AwardedBadgeResponse,
        BadgeListResponse,
        LeaderboardResponse,
        LeaderboardEntryResponse,
        LeaderboardFiltersResponse,
    )),
    tags(
        (name = "completions", description = "Record and roll back habit completions"),
        (name = "habits", description = "Habit management"),
        (name = "users", description = "User registration and profiles"),
        (name = "badges", description = "Badge catalogue and awards"),
        (name = "leaderboard", description = "Ranked standings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
