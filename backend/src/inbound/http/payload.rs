//! Extractor configuration so malformed bodies, queries, and paths produce
//! the same JSON error envelope as every other validation failure.

use actix_web::{HttpRequest, web};

use super::validation::invalid_body_error;

/// Largest accepted JSON body in bytes.
pub const MAX_JSON_PAYLOAD: usize = 16 * 1024;

/// JSON extractor settings for API routes.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use habits_backend::inbound::http::payload::json_config;
///
/// let scope = web::scope("/api/v1").app_data(json_config());
/// let _app = App::new().service(scope);
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req: &HttpRequest| invalid_body_error(&err).into())
}

/// Query-string extractor settings for API routes.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| invalid_body_error(&err).into())
}

/// Path extractor settings for API routes.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req: &HttpRequest| invalid_body_error(&err).into())
}
