//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, IdValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    ConflictingFilters,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::ConflictingFilters => "conflicting_filters",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Reject a request naming more than one mutually exclusive filter.
pub(crate) fn conflicting_filters_error(fields: &[FieldName]) -> Error {
    let names: Vec<&str> = fields.iter().map(FieldName::as_str).collect();
    Error::invalid_request(format!("at most one of {} may be given", names.join(", ")))
        .with_details(json!({
            "fields": names,
            "code": ErrorCode::ConflictingFilters.as_str(),
        }))
}

pub(crate) fn invalid_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request: {reason}")).with_details(json!({
        "code": ErrorCode::InvalidBody.as_str(),
    }))
}

/// Validation failure for a single field, carrying a domain-specific code.
pub(crate) fn invalid_field_error(
    field: FieldName,
    code: &'static str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

/// Parse a typed identifier, mapping blank input to a missing field.
pub(crate) fn parse_id<T>(
    value: String,
    field: FieldName,
    parse: impl FnOnce(String) -> Result<T, IdValidationError>,
) -> Result<T, Error> {
    parse(value.clone()).map_err(|err| match err {
        IdValidationError::Empty => missing_field_error(field),
        IdValidationError::Invalid => invalid_uuid_error(field, &value),
    })
}

pub(crate) fn parse_required_id<T>(
    value: Option<String>,
    field: FieldName,
    parse: impl FnOnce(String) -> Result<T, IdValidationError>,
) -> Result<T, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    parse_id(value, field, parse)
}

pub(crate) fn parse_optional_id<T>(
    value: Option<String>,
    field: FieldName,
    parse: impl FnOnce(String) -> Result<T, IdValidationError>,
) -> Result<Option<T>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id(raw, field, parse))
        .transpose()
}

/// Read the leading integer of a query value; blank values count as absent.
///
/// Trailing garbage is ignored and a value with no leading digits reads as
/// zero, so `"12abc"` is 12 and `"ten"` is 0. Out-of-range values saturate.
pub(crate) fn parse_lenient_integer(value: Option<&str>) -> Option<i64> {
    let raw = value.map(str::trim).filter(|raw| !raw.is_empty())?;
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });
    Some(if negative { -magnitude } else { magnitude })
}
