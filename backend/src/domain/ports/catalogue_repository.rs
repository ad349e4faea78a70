//! Driven ports for CRUD access to catalogue entities.
//!
//! All four repositories share one error type so HTTP handlers map store
//! failures uniformly.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::catalogue::{
    Car, CarDraft, CarId, CarPatch, Engine, EngineDraft, EngineId, EnginePatch, NamedReference,
    Performance, PerformanceDraft, PerformanceId, PerformancePatch, PerformanceSearch,
    ReferenceId, ReferenceKind, ReferenceName,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "catalogue store unavailable: {message}",
        /// Statement failed for a reason the caller cannot fix.
        Query { message: String } => "catalogue query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "{message}",
        /// The write pointed at a row that does not exist.
        MissingReference { message: String } => "{message}",
        /// The row is still referenced and cannot be removed.
        StillReferenced { message: String } => "{message}",
    }
}

impl From<CatalogueRepositoryError> for Error {
    fn from(err: CatalogueRepositoryError) -> Self {
        match err {
            CatalogueRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue store unavailable: {message}"))
            }
            CatalogueRepositoryError::Query { message } => {
                Error::internal(format!("catalogue query failed: {message}"))
            }
            CatalogueRepositoryError::Duplicate { message }
            | CatalogueRepositoryError::StillReferenced { message } => Error::conflict(message),
            CatalogueRepositoryError::MissingReference { message } => {
                Error::invalid_request(message)
            }
        }
    }
}

/// Companies and fuel types: entities made of an id and a unique name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn list(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError>;

    async fn find(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError>;

    async fn create(
        &self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, CatalogueRepositoryError>;

    /// Returns `None` when no row has the given id.
    async fn rename(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError>;

    /// Returns `false` when no row has the given id.
    async fn delete(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<bool, CatalogueRepositoryError>;

    /// Case-insensitive substring match on the name.
    async fn search(
        &self,
        kind: ReferenceKind,
        query: &str,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Engine>, CatalogueRepositoryError>;

    async fn find(&self, id: EngineId) -> Result<Option<Engine>, CatalogueRepositoryError>;

    async fn create(&self, draft: &EngineDraft) -> Result<Engine, CatalogueRepositoryError>;

    async fn update(
        &self,
        id: EngineId,
        patch: &EnginePatch,
    ) -> Result<Option<Engine>, CatalogueRepositoryError>;

    async fn delete(&self, id: EngineId) -> Result<bool, CatalogueRepositoryError>;

    /// Case-insensitive substring match on the engine type.
    async fn search(&self, query: &str) -> Result<Vec<Engine>, CatalogueRepositoryError>;
}

/// Cars are returned with their company and fuel type names joined in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, CatalogueRepositoryError>;

    async fn find(&self, id: CarId) -> Result<Option<Car>, CatalogueRepositoryError>;

    async fn create(&self, draft: &CarDraft) -> Result<Car, CatalogueRepositoryError>;

    async fn update(
        &self,
        id: CarId,
        patch: &CarPatch,
    ) -> Result<Option<Car>, CatalogueRepositoryError>;

    async fn delete(&self, id: CarId) -> Result<bool, CatalogueRepositoryError>;

    /// Case-insensitive substring match on the car name.
    async fn search(&self, query: &str) -> Result<Vec<Car>, CatalogueRepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Performance>, CatalogueRepositoryError>;

    async fn find(
        &self,
        id: PerformanceId,
    ) -> Result<Option<Performance>, CatalogueRepositoryError>;

    async fn create(
        &self,
        draft: &PerformanceDraft,
    ) -> Result<Performance, CatalogueRepositoryError>;

    async fn update(
        &self,
        id: PerformanceId,
        patch: &PerformancePatch,
    ) -> Result<Option<Performance>, CatalogueRepositoryError>;

    async fn delete(&self, id: PerformanceId) -> Result<bool, CatalogueRepositoryError>;

    async fn search(
        &self,
        filter: PerformanceSearch,
    ) -> Result<Vec<Performance>, CatalogueRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(CatalogueRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(CatalogueRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(CatalogueRepositoryError::duplicate("company exists"), ErrorCode::Conflict)]
    #[case(
        CatalogueRepositoryError::still_referenced("company in use"),
        ErrorCode::Conflict
    )]
    #[case(
        CatalogueRepositoryError::missing_reference("no such engine"),
        ErrorCode::InvalidRequest
    )]
    fn repository_errors_map_to_api_codes(
        #[case] err: CatalogueRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let api: Error = err.into();
        assert_eq!(api.code(), expected);
    }

    #[rstest]
    fn client_facing_messages_are_preserved() {
        let api: Error = CatalogueRepositoryError::duplicate("company 'BMW' already exists").into();
        assert_eq!(api.message(), "company 'BMW' already exists");
    }
}
