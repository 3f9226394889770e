//! Helpers shared by the integration suites in `backend/tests/`.
//!
//! Each suite is its own crate, so common code is pulled in with
//! `mod support;` rather than through the library.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

/// Describe a `postgres` error including SQLSTATE and server detail.
///
/// `Display` on `postgres::Error` often prints only `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut parts = vec![format!(
        "postgres error {}: {}",
        db_error.code().code(),
        db_error.message()
    )];
    parts.extend(db_error.detail().map(|detail| format!("detail: {detail}")));
    parts.extend(db_error.hint().map(|hint| format!("hint: {hint}")));
    parts.join("; ")
}
