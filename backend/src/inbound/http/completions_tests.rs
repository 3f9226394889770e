//! Tests for completion HTTP handlers.

use super::*;
use crate::domain::ports::{MockCompletionCommand, MockCompletionQuery};
use crate::domain::{Badge, BadgeId, BadgeName, Completion, RevertedCompletion};
use crate::inbound::http::test_utils::{MockPorts, call_json};
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Ids {
    habit: HabitId,
    user: UserId,
}

#[fixture]
fn ids() -> Ids {
    Ids {
        habit: HabitId::random(),
        user: UserId::random(),
    }
}

fn completion(ids: &Ids, points: u32) -> Completion {
    Completion {
        id: CompletionId::random(),
        habit_id: ids.habit,
        user_id: ids.user,
        completion_date: Utc
            .with_ymd_and_hms(2025, 1, 1, 8, 30, 0)
            .single()
            .expect("valid timestamp"),
        points_earned: points,
    }
}

fn first_step() -> Badge {
    Badge {
        id: BadgeId::random(),
        name: BadgeName::new("First Step").expect("valid name"),
        description: "Earned your first 10 points".to_owned(),
        points_threshold: 10,
    }
}

#[rstest]
#[actix_web::test]
async fn recording_returns_points_and_awarded_badges(ids: Ids) {
    let (habit, user) = (ids.habit, ids.user);
    let recorded = RecordedCompletion {
        completion: completion(&ids, 10),
        total_points: 10,
        awarded_badges: vec![first_step()],
    };
    let mut command = MockCompletionCommand::new();
    command
        .expect_record_completion()
        .withf(move |habit_id, user_id| *habit_id == habit && *user_id == user)
        .times(1)
        .return_once(move |_, _| Ok(recorded));
    let ports = MockPorts {
        completions: command,
        ..MockPorts::default()
    };

    let (status, body) = call_json(
        ports,
        TestRequest::post().uri("/api/v1/completions").set_json(json!({
            "habit_id": habit.to_string(),
            "user_id": user.to_string(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["points_earned"], json!(10));
    assert_eq!(body["total_points"], json!(10));
    assert_eq!(body["message"], json!("Habit completed successfully!"));
    assert_eq!(body["awarded_badges"][0]["name"], json!("First Step"));
}

#[rstest]
#[case(json!({"user_id": "6c0a3a55-57a4-4a0e-9a57-1a6f0d0b0a01"}), "habit_id", "missing_field")]
#[case(json!({"habit_id": "6c0a3a55-57a4-4a0e-9a57-1a6f0d0b0a01"}), "user_id", "missing_field")]
#[case(
    json!({"habit_id": "nope", "user_id": "6c0a3a55-57a4-4a0e-9a57-1a6f0d0b0a01"}),
    "habit_id",
    "invalid_uuid"
)]
#[actix_web::test]
async fn recording_requires_both_identifiers(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::post().uri("/api/v1/completions").set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!(field));
    assert_eq!(body["details"]["code"], json!(code));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::post()
            .uri("/api/v1/completions")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}

#[rstest]
#[actix_web::test]
async fn unknown_habit_is_not_found(ids: Ids) {
    let mut command = MockCompletionCommand::new();
    command
        .expect_record_completion()
        .return_once(|_, _| Err(Error::not_found("habit not found")));
    let ports = MockPorts {
        completions: command,
        ..MockPorts::default()
    };

    let (status, body) = call_json(
        ports,
        TestRequest::post().uri("/api/v1/completions").set_json(json!({
            "habit_id": ids.habit.to_string(),
            "user_id": ids.user.to_string(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("habit not found"));
}

#[rstest]
#[actix_web::test]
async fn failed_transactions_are_redacted(ids: Ids) {
    let mut command = MockCompletionCommand::new();
    command.expect_record_completion().return_once(|_, _| {
        Err(Error::internal(
            "completion ledger error: injected failure at award_badges",
        ))
    });
    let ports = MockPorts {
        completions: command,
        ..MockPorts::default()
    };

    let (status, body) = call_json(
        ports,
        TestRequest::post().uri("/api/v1/completions").set_json(json!({
            "habit_id": ids.habit.to_string(),
            "user_id": ids.user.to_string(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Internal server error"));
    assert!(body.get("details").is_none());
    assert!(body.get("trace_id").and_then(Value::as_str).is_some());
}

#[rstest]
#[actix_web::test]
async fn deleting_confirms_the_rollback(ids: Ids) {
    let completion_id = CompletionId::random();
    let user = ids.user;
    let mut command = MockCompletionCommand::new();
    command
        .expect_delete_completion()
        .withf(move |id| *id == completion_id)
        .times(1)
        .return_once(move |_| {
            Ok(RevertedCompletion {
                completion_id,
                user_id: user,
                points_reverted: 10,
                total_points: 0,
            })
        });
    let ports = MockPorts {
        completions: command,
        ..MockPorts::default()
    };

    let (status, body) = call_json(
        ports,
        TestRequest::delete().uri(&format!("/api/v1/completions/{completion_id}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Completion deleted successfully"}));
}

#[rstest]
#[actix_web::test]
async fn deleting_with_a_malformed_id_is_rejected() {
    let (status, body) = call_json(
        MockPorts::default(),
        TestRequest::delete().uri("/api/v1/completions/42"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], json!("invalid_uuid"));
}

#[rstest]
#[case(None, None, CompletionFilter::All)]
#[case(Some("user"), None, CompletionFilter::ByUser(UserId::from_uuid(uuid::Uuid::nil())))]
#[case(None, Some("habit"), CompletionFilter::ByHabit(HabitId::from_uuid(uuid::Uuid::nil())))]
#[actix_web::test]
async fn listing_maps_query_filters(
    #[case] user: Option<&str>,
    #[case] habit: Option<&str>,
    #[case] expected: CompletionFilter,
) {
    let nil = uuid::Uuid::nil().to_string();
    let mut params = Vec::new();
    if user.is_some() {
        params.push(format!("user_id={nil}"));
    }
    if habit.is_some() {
        params.push(format!("habit_id={nil}"));
    }
    let mut query = MockCompletionQuery::new();
    query
        .expect_list_completions()
        .withf(move |filter| *filter == expected)
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let ports = MockPorts {
        completions_query: query,
        ..MockPorts::default()
    };

    let uri = format!("/api/v1/completions?{}", params.join("&"));
    let (status, body) = call_json(ports, TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn listing_rejects_two_filters(ids: Ids) {
    let uri = format!(
        "/api/v1/completions?user_id={}&habit_id={}",
        ids.user, ids.habit
    );
    let (status, body) = call_json(MockPorts::default(), TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], json!("conflicting_filters"));
}

#[rstest]
#[actix_web::test]
async fn listing_renders_history_rows(ids: Ids) {
    let entry = CompletionEntry {
        completion: completion(&ids, 25),
        habit_name: "Read".to_owned(),
        username: "ada".to_owned(),
    };
    let mut query = MockCompletionQuery::new();
    query
        .expect_list_completions()
        .return_once(move |_| Ok(vec![entry]));
    let ports = MockPorts {
        completions_query: query,
        ..MockPorts::default()
    };

    let (status, body) = call_json(ports, TestRequest::get().uri("/api/v1/completions")).await;

    assert_eq!(status, StatusCode::OK);
    let row = &body[0];
    assert_eq!(row["habit_name"], json!("Read"));
    assert_eq!(row["username"], json!("ada"));
    assert_eq!(row["points_earned"], json!(25));
    assert_eq!(row["completion_date"], json!("2025-01-01T08:30:00+00:00"));
}
