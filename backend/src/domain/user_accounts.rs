//! Account services behind the login, registration and current-user ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::password::PasswordDigest;
use crate::domain::ports::{
    LoginService, NewUserRecord, UserPersistenceError, UserRegistration, UserRepository,
    UsersQuery,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Implements the account driving ports over a [`UserRepository`].
#[derive(Clone)]
pub struct UserAccountService<R: ?Sized> {
    users: Arc<R>,
}

impl<R: ?Sized> UserAccountService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("{field} is already registered")).with_details(json!({
                "field": field,
                "code": "duplicate",
            }))
        }
    }
}

#[async_trait]
impl<R> LoginService for UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?;
        // Unknown users and wrong passwords are indistinguishable to callers.
        match stored {
            Some(stored) if stored.password.verify(credentials.password()) => Ok(stored.user),
            _ => Err(Error::unauthorized(INVALID_CREDENTIALS)),
        }
    }
}

#[async_trait]
impl<R> UserRegistration for UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let record = NewUserRecord {
            username: registration.username().clone(),
            email: registration.email().clone(),
            password: PasswordDigest::hash(registration.password()),
        };
        let user = self
            .users
            .create(&record)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}

#[async_trait]
impl<R> UsersQuery for UserAccountService<R>
where
    R: UserRepository + ?Sized,
{
    async fn current_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            // A session can outlive its account.
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }
}
