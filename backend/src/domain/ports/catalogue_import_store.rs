//! Driven port for the transactional side of a catalogue import.
//!
//! An import runs inside one transaction obtained from
//! [`CatalogueImportStore::begin`]. Each CSV row is wrapped in a savepoint so
//! a failing row can be undone without losing the rows before it.

use async_trait::async_trait;

use crate::domain::catalogue::{
    CarDraft, CarId, EngineDraft, EngineId, NamedReference, PerformanceDraft, PerformanceId,
    ReferenceKind, ReferenceName,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised while writing an import.
    pub enum ImportStoreError {
        /// Store could not be reached.
        Connection { message: String } => "import store unavailable: {message}",
        /// Statement failed.
        Query { message: String } => "import query failed: {message}",
        /// A constraint rejected a row's write.
        Constraint { message: String } => "constraint violated: {message}",
    }
}

/// Opens import transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueImportStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ImportTransaction>, ImportStoreError>;
}

/// An open import transaction.
///
/// Dropping the handle without calling [`ImportTransaction::commit`] discards
/// every write.
#[async_trait]
pub trait ImportTransaction: Send {
    /// Open a nested savepoint.
    async fn savepoint(&mut self) -> Result<(), ImportStoreError>;

    /// Keep the writes made since the innermost savepoint.
    async fn release_savepoint(&mut self) -> Result<(), ImportStoreError>;

    /// Undo the writes made since the innermost savepoint.
    async fn rollback_to_savepoint(&mut self) -> Result<(), ImportStoreError>;

    /// Exact-name lookup of a company or fuel type.
    async fn find_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, ImportStoreError>;

    async fn insert_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, ImportStoreError>;

    async fn insert_engine(&mut self, draft: &EngineDraft) -> Result<EngineId, ImportStoreError>;

    async fn insert_car(&mut self, draft: &CarDraft) -> Result<CarId, ImportStoreError>;

    async fn insert_performance(
        &mut self,
        draft: &PerformanceDraft,
    ) -> Result<PerformanceId, ImportStoreError>;

    async fn commit(self: Box<Self>) -> Result<(), ImportStoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), ImportStoreError>;
}
