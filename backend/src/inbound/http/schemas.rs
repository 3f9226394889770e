//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; request
//! and response DTOs in the handler modules derive it directly and refer to
//! the wrappers here for domain enums.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required field is missing or malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The referenced resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The change would violate a uniqueness rule.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::LeaderboardOrder`].
#[derive(ToSchema)]
#[schema(as = crate::domain::LeaderboardOrder)]
pub enum LeaderboardOrderSchema {
    #[schema(rename = "points")]
    Points,
    #[schema(rename = "username")]
    Username,
    #[schema(rename = "badges_count")]
    BadgesCount,
}

/// OpenAPI schema for [`crate::domain::SortDirection`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SortDirection)]
pub enum SortDirectionSchema {
    #[schema(rename = "asc")]
    Asc,
    #[schema(rename = "desc")]
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_is_named_after_the_domain_type() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("not_found")]
    #[case("conflict")]
    #[case("internal_error")]
    fn error_code_schema_lists_every_code(#[case] code: &str) {
        assert!(schema_to_json::<ErrorCodeSchema>().contains(code), "missing {code}");
    }

    #[rstest]
    fn leaderboard_order_schema_uses_query_values() {
        let json = schema_to_json::<LeaderboardOrderSchema>();
        for value in ["points", "username", "badges_count"] {
            assert!(json.contains(value), "missing {value}");
        }
    }
}
