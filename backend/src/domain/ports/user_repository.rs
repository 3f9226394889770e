//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, UserProfile, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// No user exists with the identifier.
        NotFound { user_id: UserId } => "user {user_id} not found",
        /// Another user already holds the username.
        DuplicateUsername { username: String } =>
            "username {username} is already taken",
        /// Another user already holds the email address.
        DuplicateEmail { email: String } =>
            "email {email} is already registered",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for registering and maintaining users.
///
/// Point totals are never written through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user with zero points.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// All users ordered by `total_points` descending, then username and id.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// The user and their awards, or `None` when absent.
    async fn find_profile(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Apply a non-empty change set.
    async fn update(&self, id: &UserId, update: &UserUpdate) -> Result<User, UserRepositoryError>;

    /// Delete the user together with their habits, completions, and awards.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;
}
