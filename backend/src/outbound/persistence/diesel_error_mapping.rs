//! Shared Diesel error classification for the PostgreSQL adapters.
//!
//! Adapters classify a [`diesel::result::Error`] into a [`StoreFailure`] and
//! then map it onto their own port error using the constraint names declared
//! in the migrations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

pub(crate) const USERS_USERNAME_KEY: &str = "users_username_key";
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const BADGES_NAME_KEY: &str = "badges_name_key";
pub(crate) const HABITS_USER_FKEY: &str = "habits_user_id_fkey";
pub(crate) const COMPLETIONS_HABIT_FKEY: &str = "completions_habit_id_fkey";
pub(crate) const COMPLETIONS_USER_FKEY: &str = "completions_user_id_fkey";

/// Storage failure reduced to the cases adapters distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    UniqueViolation { constraint: Option<String> },
    ForeignKeyViolation { constraint: Option<String> },
    Connection { message: String },
    Query { message: String },
}

impl StoreFailure {
    /// True when the failure is a violation of `constraint`.
    pub(crate) fn violates(&self, constraint: &str) -> bool {
        match self {
            Self::UniqueViolation {
                constraint: Some(name),
            }
            | Self::ForeignKeyViolation {
                constraint: Some(name),
            } => name == constraint,
            _ => false,
        }
    }

    /// Human readable description for connection and query errors.
    pub(crate) fn message(&self) -> String {
        match self {
            Self::UniqueViolation { .. } => "unique constraint violated".to_owned(),
            Self::ForeignKeyViolation { .. } => "foreign key constraint violated".to_owned(),
            Self::Connection { message } | Self::Query { message } => message.clone(),
        }
    }

    pub(crate) const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, emitting debug context.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query {
            message: "record not found".to_owned(),
        },
        DieselError::QueryBuilderError(_) => StoreFailure::Query {
            message: "database query error".to_owned(),
        },
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection {
                message: "database connection error".to_owned(),
            }
        }
        DieselError::DatabaseError(_, _) => StoreFailure::Query {
            message: "database error".to_owned(),
        },
        _ => StoreFailure::Query {
            message: "database error".to_owned(),
        },
    }
}
