//! End-to-end HTTP tests over the in-memory store.
//!
//! Requests go through the real route table, payload configuration, and
//! trace middleware so status codes and JSON shapes match a running server.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use habits_backend::Trace;
use habits_backend::inbound::http::configure_api;
use habits_backend::inbound::http::state::HttpState;
use habits_backend::outbound::memory::InMemoryStore;
use habits_backend::test_support::MutableClock;
use rstest::rstest;
use serde_json::{Value, json};

fn state() -> HttpState {
    let clock = Arc::new(MutableClock::fixed());
    let store = InMemoryStore::with_default_badges(clock).expect("default badges are valid");
    HttpState::from_store(Arc::new(store))
}

async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("response carries an id").to_owned()
}

fn badge_names(badges: &Value) -> Vec<&str> {
    badges
        .as_array()
        .expect("badges array")
        .iter()
        .filter_map(|badge| badge["name"].as_str())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn completion_flow_credits_points_awards_badges_and_rolls_back() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;

    let (status, user) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "username": "ana_runs", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["total_points"], 0);
    let user_id = id_of(&user);

    let (status, habit) = send(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/habits").set_json(json!({
            "user_id": user_id,
            "name": "Read a chapter",
            "points_per_completion": 60,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let habit_id = id_of(&habit);
    let completion = json!({ "habit_id": habit_id, "user_id": user_id });

    let (status, first) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/completions")
            .set_json(&completion),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["points_earned"], 60);
    assert_eq!(first["total_points"], 60);
    assert_eq!(badge_names(&first["awarded_badges"]), vec!["First Step"]);

    let (status, second) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/completions")
            .set_json(&completion),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["total_points"], 120);
    assert_eq!(badge_names(&second["awarded_badges"]), vec!["Dedicated"]);

    let (status, board) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/leaderboard"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let top = &board["leaderboard"][0];
    assert_eq!(top["username"], "ana_runs");
    assert_eq!(top["points"], 120);
    assert_eq!(top["badges_count"], 2);
    assert_eq!(top["completions_count"], 2);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/completions/{}", id_of(&second))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, profile) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{user_id}")),
    )
    .await;
    assert_eq!(profile["total_points"], 60);
    assert_eq!(profile["badges"].as_array().map(Vec::len), Some(2));

    let (status, deleted) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/habits/{habit_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["completions_reverted"], 1);
    assert_eq!(deleted["points_reverted"], 60);

    let (_, profile) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{user_id}")),
    )
    .await;
    assert_eq!(profile["total_points"], 0);
}

#[rstest]
#[actix_web::test]
async fn unknown_habit_is_reported_without_side_effects() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;

    let (_, user) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "username": "bo_lifts", "email": "bo@example.com" })),
    )
    .await;
    let user_id = id_of(&user);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/completions")
            .set_json(json!({
                "habit_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "user_id": user_id,
            })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (_, completions) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/completions?user_id={user_id}")),
    )
    .await;
    assert_eq!(completions, json!([]));

    let (_, profile) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{user_id}")),
    )
    .await;
    assert_eq!(profile["total_points"], 0);
    assert_eq!(profile["badges"], json!([]));
}

#[rstest]
#[case("/api/v1/users", json!({ "username": "x", "email": "x@example.com" }), "username_too_short")]
#[case("/api/v1/badges", json!({ "name": "", "points_threshold": 5 }), "empty_name")]
#[actix_web::test]
async fn invalid_payloads_are_rejected_with_codes(
    #[case] uri: &str,
    #[case] payload: Value,
    #[case] expected_code: &str,
) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post().uri(uri).set_json(&payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], expected_code);
}
