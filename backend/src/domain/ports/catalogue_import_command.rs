//! Driving port for running a catalogue import.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::catalogue_import::ImportReport;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueImportCommand: Send + Sync {
    /// Import the configured catalogue file and report what happened.
    ///
    /// Row-level problems are returned inside the report. An `Err` means
    /// nothing was committed.
    async fn import_catalogue(&self) -> Result<ImportReport, Error>;
}
