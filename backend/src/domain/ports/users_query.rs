//! Driving port for user-facing account queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch the account behind a session.
    async fn current_user(&self, id: UserId) -> Result<User, Error>;
}
