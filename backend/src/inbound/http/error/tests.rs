//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("connection reset by peer")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("habit_id must be a valid UUID")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "habit_id"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> ErrorResponse {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(
    internal_error_case: Error,
    expected_trace_id: String,
) {
    let payload = assert_error_response(
        internal_error_case,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code, ErrorCode::InternalError);
    assert_eq!(payload.error, "Internal server error");
    assert_eq!(payload.trace_id.as_deref(), Some(TRACE_ID));
    assert!(payload.details.is_none());
}

#[rstest]
#[actix_web::test]
async fn validation_errors_keep_message_and_details(
    invalid_request_case: Error,
    expected_trace_id: String,
) {
    let payload = assert_error_response(
        invalid_request_case,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;

    assert_eq!(payload.code, ErrorCode::InvalidRequest);
    assert_eq!(payload.error, "habit_id must be a valid UUID");
    assert_eq!(payload.details, Some(json!({"field": "habit_id"})));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::not_found("completion not found");

    let payload = assert_error_response(error, StatusCode::NOT_FOUND, None).await;

    assert_eq!(payload.code, ErrorCode::NotFound);
    assert_eq!(payload.trace_id, None);
}

#[rstest]
fn body_uses_snake_case_codes() {
    let body = serde_json::to_value(ErrorResponse::from(&Error::conflict("username taken")))
        .expect("serialise");
    assert_eq!(body, json!({"error": "username taken", "code": "conflict"}));
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
