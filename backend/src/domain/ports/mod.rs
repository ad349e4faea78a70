//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, the import store and the CSV source) are
//! implemented by outbound adapters. Driving ports (login, registration,
//! user queries and the import command) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_import_command;
mod catalogue_import_store;
mod catalogue_repository;
mod catalogue_source;
mod login_service;
mod user_registration;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use catalogue_import_command::MockCatalogueImportCommand;
pub use catalogue_import_command::CatalogueImportCommand;
#[cfg(test)]
pub use catalogue_import_store::MockCatalogueImportStore;
pub use catalogue_import_store::{CatalogueImportStore, ImportStoreError, ImportTransaction};
#[cfg(test)]
pub use catalogue_repository::{
    MockCarRepository, MockEngineRepository, MockPerformanceRepository, MockReferenceRepository,
};
pub use catalogue_repository::{
    CarRepository, CatalogueRepositoryError, EngineRepository, PerformanceRepository,
    ReferenceRepository,
};
#[cfg(test)]
pub use catalogue_source::MockCatalogueSource;
pub use catalogue_source::{CatalogueSource, CatalogueSourceError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUserRecord, StoredUser, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
