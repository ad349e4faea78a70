//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::password::PasswordDigest;
use crate::domain::ports::{NewUserRecord, StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::error_mapping::{map_pool_error, user_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Rebuild the domain account from a stored row.
///
/// Rows are written through validated domain types, so a failure here means
/// the table was edited out of band.
fn row_to_stored(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let corrupt =
        |what: &str| UserPersistenceError::query(format!("stored user {} has invalid {what}", row.id));
    let username = Username::new(&row.username).map_err(|_| corrupt("username"))?;
    let email = EmailAddress::new(&row.email).map_err(|_| corrupt("email"))?;
    let password =
        PasswordDigest::from_stored(row.password_hash.as_str()).map_err(|_| corrupt("password"))?;
    Ok(StoredUser {
        user: User::new(UserId::new(row.id), username, email, row.created_at),
        password,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let new_row = NewUserRow {
            username: record.username.as_str(),
            email: record.email.as_str(),
            password_hash: record.password.as_str(),
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(user_error)?;
        row_to_stored(row).map(|stored| stored.user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(user_error)?;
        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(user_error)?;
        row.map(|row| row_to_stored(row).map(|stored| stored.user))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(username: &str, password_hash: &str) -> UserRow {
        UserRow {
            id: 7,
            username: username.to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid time"),
        }
    }

    #[rstest]
    fn stored_rows_become_accounts() {
        let digest = PasswordDigest::hash("correct horse");
        let stored = row_to_stored(row("ada", digest.as_str())).expect("valid row");

        assert_eq!(stored.user.id(), UserId::new(7));
        assert_eq!(stored.user.username().as_str(), "ada");
        assert!(stored.password.verify("correct horse"));
    }

    #[rstest]
    #[case("", "sha256$00$00", "username")]
    #[case("ada", "plaintext", "password")]
    fn corrupt_rows_are_query_failures(
        #[case] username: &str,
        #[case] hash: &str,
        #[case] what: &str,
    ) {
        let err = row_to_stored(row(username, hash)).expect_err("corrupt row");

        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert!(err.to_string().contains(what), "{err}");
    }
}
