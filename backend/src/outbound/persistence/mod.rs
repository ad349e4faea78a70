//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the catalogue, import and user ports backed
//! by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and the table
//!   definitions (`schema.rs`) never leave this module.
//! - **Typed errors**: every Diesel failure is classified once in
//!   `error_mapping.rs` and surfaces as the owning port's error.
//!
//! # Example
//!
//! ```ignore
//! use car_catalogue::outbound::persistence::{DbPool, DieselCarRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cars")).await?;
//! let cars = DieselCarRepository::new(pool);
//! ```

mod diesel_car_repository;
mod diesel_catalogue_import_store;
mod diesel_engine_repository;
mod diesel_performance_repository;
mod diesel_reference_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod reference_tables;
pub(crate) mod schema;

pub use diesel_car_repository::DieselCarRepository;
pub use diesel_catalogue_import_store::DieselCatalogueImportStore;
pub use diesel_engine_repository::DieselEngineRepository;
pub use diesel_performance_repository::DieselPerformanceRepository;
pub use diesel_reference_repository::DieselReferenceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
