//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories and the import store
//! - **catalogue_csv**: reads the catalogue spreadsheet export from disk
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod catalogue_csv;
pub mod persistence;
