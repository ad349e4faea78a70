//! Test doubles and fixtures shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! `tests/` suites can reach it.

pub mod catalogue_csv;
pub mod in_memory;

pub use catalogue_csv::{CATALOGUE_HEADER, CatalogueCsvFixture, catalogue_line};
pub use in_memory::InMemoryCatalogue;
