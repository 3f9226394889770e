//! User domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{UserCommand, UserQuery, UserRepository, UserRepositoryError};
use crate::domain::{Error, NewUser, User, UserId, UserProfile, UserUpdate};

/// User service implementing [`UserCommand`] and [`UserQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found("user not found").with_details(json!({ "user_id": id.to_string() }))
}

fn map_user_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::NotFound { user_id } => user_not_found(&user_id),
        UserRepositoryError::DuplicateUsername { username } => {
            Error::conflict("username already taken")
                .with_details(json!({ "field": "username", "value": username }))
        }
        UserRepositoryError::DuplicateEmail { email } => Error::conflict("email already registered")
            .with_details(json!({ "field": "email", "value": email })),
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> UserCommand for UserService<R>
where
    R: UserRepository,
{
    async fn register_user(&self, user: NewUser) -> Result<User, Error> {
        self.repo.create(&user).await.map_err(map_user_error)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        self.repo.update(&id, &update).await.map_err(map_user_error)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        self.repo.delete(&id).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<R> UserQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo.list().await.map_err(map_user_error)
    }

    async fn get_user_profile(&self, id: UserId) -> Result<UserProfile, Error> {
        self.repo
            .find_profile(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(&id))
    }
}
