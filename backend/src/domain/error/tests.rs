//! Tests for domain error construction and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;
use uuid::Uuid;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn with_details_attaches_payload(base_error: Error) {
    let err = base_error.with_details(json!({"field": "habit_id"}));
    assert_eq!(err.details(), Some(&json!({"field": "habit_id"})));
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::not_found("habit not found").to_string(), "habit not found");
}

#[test]
fn errors_outside_a_request_have_no_trace_id() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn errors_capture_the_scoped_trace_id() {
    let trace_id = TraceId::from_uuid(Uuid::nil());
    let err = TraceId::scope(trace_id, async { Error::conflict("duplicate") }).await;
    assert_eq!(err.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn explicit_trace_id_overrides_captured_value(base_error: Error) {
    let err = base_error.with_trace_id("abc");
    assert_eq!(err.trace_id(), Some("abc"));
}
