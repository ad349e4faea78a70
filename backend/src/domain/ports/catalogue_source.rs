//! Driven port that yields raw catalogue rows from a file.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::catalogue_import::CatalogueRow;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading a catalogue file.
    pub enum CatalogueSourceError {
        /// The file does not exist.
        NotFound { path: String } => "catalogue file not found: {path}",
        /// The file exists but could not be read.
        Unreadable { path: String, message: String } => "failed to read {path}: {message}",
        /// The content is not a usable CSV table.
        Malformed { message: String } => "malformed catalogue file: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Read every data row, in file order.
    async fn read_rows(&self, path: &Path) -> Result<Vec<CatalogueRow>, CatalogueSourceError>;
}
