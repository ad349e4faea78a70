//! Import orchestration and the service behind the import command port.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::Error;
use crate::domain::ports::{
    CatalogueImportCommand, CatalogueImportStore, CatalogueSource, CatalogueSourceError,
    ImportStoreError, ImportTransaction,
};

use super::{CatalogueRow, ImportReport, RowFailure, RowOutcome, import_row};

/// Failures that abort a whole run. Nothing is committed when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Source(#[from] CatalogueSourceError),
    #[error(transparent)]
    Store(#[from] ImportStoreError),
}

impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Store(ImportStoreError::Connection { message }) => {
                Error::service_unavailable(format!("import store unavailable: {message}"))
            }
            other => Error::internal(format!("catalogue import failed: {other}")),
        }
    }
}

/// Import `rows` in one transaction with a savepoint per row.
///
/// Failing rows are rolled back to their savepoint and recorded in the
/// report; the remaining rows are committed together at the end. Errors
/// from the transaction itself (opening it, savepoints, the commit) abort
/// the run.
pub async fn run_import<T>(
    store: &T,
    rows: &[CatalogueRow],
) -> Result<ImportReport, ImportStoreError>
where
    T: CatalogueImportStore + ?Sized,
{
    let mut tx = store.begin().await?;
    let mut report = ImportReport::default();

    for row in rows {
        let outcome = match import_in_savepoint(tx.as_mut(), row).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed import did not complete");
                }
                return Err(err);
            }
        };
        if let RowOutcome::Failed(failure) = &outcome {
            warn!(row = failure.row, cause = %failure.message, "skipped catalogue row");
        }
        report.record(outcome);
    }

    tx.commit().await?;
    info!(
        rows_read = report.rows_read,
        rows_imported = report.rows_imported,
        failures = report.failures.len(),
        companies = report.created.companies,
        fuel_types = report.created.fuel_types,
        engines = report.created.engines,
        cars = report.created.cars,
        performances = report.created.performances,
        "catalogue import committed"
    );
    Ok(report)
}

async fn import_in_savepoint(
    tx: &mut dyn ImportTransaction,
    row: &CatalogueRow,
) -> Result<RowOutcome, ImportStoreError> {
    tx.savepoint().await?;
    match import_row(tx, row).await {
        Ok(created) => {
            tx.release_savepoint().await?;
            Ok(RowOutcome::Imported(created))
        }
        Err(err) => {
            tx.rollback_to_savepoint().await?;
            Ok(RowOutcome::Failed(RowFailure {
                row: row.line(),
                message: err.to_string(),
            }))
        }
    }
}

/// Reads a catalogue file and imports it.
#[derive(Clone)]
pub struct CatalogueImportService<S: ?Sized, T: ?Sized> {
    source: Arc<S>,
    store: Arc<T>,
    path: PathBuf,
}

impl<S: ?Sized, T: ?Sized> CatalogueImportService<S, T> {
    /// `path` is the file used by [`CatalogueImportCommand::import_catalogue`].
    pub fn new(source: Arc<S>, store: Arc<T>, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            store,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<S, T> CatalogueImportService<S, T>
where
    S: CatalogueSource + ?Sized,
    T: CatalogueImportStore + ?Sized,
{
    /// Import an explicit file.
    pub async fn import_from(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let rows = self.source.read_rows(path).await?;
        info!(path = %path.display(), rows = rows.len(), "read catalogue file");
        let report = run_import(self.store.as_ref(), &rows).await?;
        Ok(report)
    }
}

#[async_trait]
impl<S, T> CatalogueImportCommand for CatalogueImportService<S, T>
where
    S: CatalogueSource + ?Sized,
    T: CatalogueImportStore + ?Sized,
{
    async fn import_catalogue(&self) -> Result<ImportReport, Error> {
        self.import_from(&self.path).await.map_err(|err| {
            error!(path = %self.path.display(), error = %err, "catalogue import failed");
            Error::from(err)
        })
    }
}
