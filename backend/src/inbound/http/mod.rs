//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every handler depends on [`state::HttpState`] only, so the adapter can be
//! exercised with mocked driving ports.

use actix_web::web;

pub mod badges;
pub mod completions;
pub mod error;
pub mod habits;
pub mod health;
pub mod leaderboard;
pub mod payload;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the `/api/v1` handlers and extractor settings on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use habits_backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(payload::json_config())
        .app_data(payload::query_config())
        .app_data(payload::path_config())
        .service(completions::record_completion)
        .service(completions::delete_completion)
        .service(completions::list_completions)
        .service(habits::list_habits)
        .service(habits::create_habit)
        .service(habits::get_habit)
        .service(habits::update_habit)
        .service(habits::delete_habit)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(badges::list_badges)
        .service(badges::create_badge)
        .service(badges::update_badge)
        .service(badges::delete_badge)
        .service(leaderboard::leaderboard);
}
