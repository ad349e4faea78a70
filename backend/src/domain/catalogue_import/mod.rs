//! CSV-to-relational catalogue import.
//!
//! The pipeline has three layers:
//! - [`resolver`] finds or creates companies and fuel types by name;
//! - [`row_importer`] turns one [`CatalogueRow`] into engine, car and
//!   performance rows;
//! - [`service`] runs every row inside a per-row savepoint, folds the
//!   outcomes into an [`ImportReport`] and commits once at the end.
//!
//! Store access always goes through an explicit
//! [`ImportTransaction`](crate::domain::ports::ImportTransaction) handle
//! scoped to one run.

mod report;
mod resolver;
mod row;
mod row_importer;
mod service;

pub use report::{EntityCounts, ImportReport, RowFailure, RowOutcome};
pub use resolver::{Resolution, ResolveError, get_or_create};
pub use row::{CatalogueRow, columns};
pub use row_importer::{RowError, import_row};
pub use service::{CatalogueImportService, ImportError, run_import};

#[cfg(test)]
mod tests;
