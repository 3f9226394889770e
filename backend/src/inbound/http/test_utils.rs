//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::ports::{
    MockBadgeCommand, MockBadgeQuery, MockCompletionCommand, MockCompletionQuery,
    MockHabitCommand, MockHabitQuery, MockLeaderboardQuery, MockUserCommand, MockUserQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;

/// One mock per driving port. Unconfigured mocks panic when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub completions: MockCompletionCommand,
    pub completions_query: MockCompletionQuery,
    pub habits: MockHabitCommand,
    pub habits_query: MockHabitQuery,
    pub users: MockUserCommand,
    pub users_query: MockUserQuery,
    pub badges: MockBadgeCommand,
    pub badges_query: MockBadgeQuery,
    pub leaderboard: MockLeaderboardQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            completions: Arc::new(self.completions),
            completions_query: Arc::new(self.completions_query),
            habits: Arc::new(self.habits),
            habits_query: Arc::new(self.habits_query),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            badges: Arc::new(self.badges),
            badges_query: Arc::new(self.badges_query),
            leaderboard: Arc::new(self.leaderboard),
        }
    }
}

/// Send `request` through the full API scope and decode the JSON body.
///
/// Empty bodies decode as [`Value::Null`].
pub(crate) async fn call_json(ports: MockPorts, request: TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}
