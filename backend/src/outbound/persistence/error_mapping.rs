//! Translation of Diesel and pool failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{CatalogueRepositoryError, ImportStoreError, UserPersistenceError};

use super::pool::PoolError;

/// Port-neutral classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    Connection(String),
    Unique {
        message: String,
        constraint: Option<String>,
    },
    ForeignKey {
        message: String,
        constraint: Option<String>,
    },
    Check(String),
    Other(String),
}

pub(crate) fn classify(error: DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            let message = info.message().to_owned();
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::Unique {
                    message,
                    constraint,
                },
                DatabaseErrorKind::ForeignKeyViolation => DbFailure::ForeignKey {
                    message,
                    constraint,
                },
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                    DbFailure::Check(message)
                }
                DatabaseErrorKind::ClosedConnection => DbFailure::Connection(message),
                _ => DbFailure::Other(message),
            }
        }
        DieselError::BrokenTransactionManager => {
            DbFailure::Connection("transaction manager is broken".to_owned())
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            DbFailure::Other(other.to_string())
        }
    }
}

pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a catalogue write failure. `subject` names the row being written,
/// e.g. `"company 'BMW'"`.
pub(crate) fn catalogue_error(error: DieselError, subject: &str) -> CatalogueRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => CatalogueRepositoryError::connection(message),
        DbFailure::Unique { constraint, .. } => CatalogueRepositoryError::duplicate(format!(
            "{subject} already exists{}",
            constraint
                .filter(|name| name.starts_with("performance_car_id"))
                .map_or("", |_| " for this car")
        )),
        DbFailure::ForeignKey {
            message,
            constraint,
        } => foreign_key_error(&message, constraint.as_deref(), subject),
        DbFailure::Check(message) => CatalogueRepositoryError::query(message),
        DbFailure::Other(message) => CatalogueRepositoryError::query(message),
    }
}

/// PostgreSQL reports the same SQLSTATE for inserting a dangling reference
/// and for deleting a referenced row; the message tells them apart.
fn foreign_key_error(
    message: &str,
    constraint: Option<&str>,
    subject: &str,
) -> CatalogueRepositoryError {
    if message.contains("is still referenced") || message.contains("update or delete on table") {
        return CatalogueRepositoryError::still_referenced(format!(
            "{subject} is still referenced by cars"
        ));
    }
    let target = match constraint {
        Some(name) if name.contains("company_id") => "company",
        Some(name) if name.contains("engine_id") => "engine",
        Some(name) if name.contains("fuel_type_id") => "fuel type",
        Some(name) if name.contains("car_id") => "car",
        _ => "referenced row",
    };
    CatalogueRepositoryError::missing_reference(format!("{target} does not exist"))
}

pub(crate) fn import_error(error: DieselError) -> ImportStoreError {
    match classify(error) {
        DbFailure::Connection(message) => ImportStoreError::connection(message),
        DbFailure::Unique { message, .. }
        | DbFailure::ForeignKey { message, .. }
        | DbFailure::Check(message) => ImportStoreError::constraint(message),
        DbFailure::Other(message) => ImportStoreError::query(message),
    }
}

pub(crate) fn user_error(error: DieselError) -> UserPersistenceError {
    match classify(error) {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        DbFailure::Unique { constraint, .. } => {
            let field = match constraint.as_deref() {
                Some(name) if name.contains("email") => "email",
                _ => "username",
            };
            UserPersistenceError::duplicate(field)
        }
        DbFailure::ForeignKey { message, .. }
        | DbFailure::Check(message)
        | DbFailure::Other(message) => UserPersistenceError::query(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify(DieselError::NotFound),
            DbFailure::Other("Record not found".to_owned())
        );
    }

    #[rstest]
    #[case(
        "update or delete on table \"companies\" violates foreign key constraint",
        Some("cars_company_id_fkey"),
        CatalogueRepositoryError::still_referenced("company 3 is still referenced by cars")
    )]
    #[case(
        "insert or update on table \"cars\" violates foreign key constraint",
        Some("cars_engine_id_fkey"),
        CatalogueRepositoryError::missing_reference("engine does not exist")
    )]
    #[case(
        "insert or update on table \"cars\" violates foreign key constraint",
        None,
        CatalogueRepositoryError::missing_reference("referenced row does not exist")
    )]
    fn foreign_key_violations_are_told_apart(
        #[case] message: &str,
        #[case] constraint: Option<&str>,
        #[case] expected: CatalogueRepositoryError,
    ) {
        assert_eq!(foreign_key_error(message, constraint, "company 3"), expected);
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(
            PoolError::checkout("timed out"),
            CatalogueRepositoryError::connection,
        );
        assert_eq!(err, CatalogueRepositoryError::connection("timed out"));
    }
}
