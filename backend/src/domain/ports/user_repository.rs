//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::password::PasswordDigest;
use crate::domain::{EmailAddress, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Username or email already belongs to another account.
        Duplicate { field: String } => "{field} is already registered",
    }
}

/// Values written when an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub username: Username,
    pub email: EmailAddress,
    pub password: PasswordDigest,
}

/// A user together with the stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password: PasswordDigest,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
