//! Catalogue import trigger.
//!
//! ```text
//! POST /api/v1/import
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::catalogue_import::{EntityCounts, ImportReport, RowFailure};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Rows created per entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCounts {
    /// Companies inserted by this run.
    pub companies: usize,
    /// Fuel types inserted by this run.
    pub fuel_types: usize,
    /// Engines inserted by this run.
    pub engines: usize,
    /// Cars inserted by this run.
    pub cars: usize,
    /// Performance records inserted by this run.
    pub performances: usize,
}

impl From<EntityCounts> for CreatedCounts {
    fn from(counts: EntityCounts) -> Self {
        Self {
            companies: counts.companies,
            fuel_types: counts.fuel_types,
            engines: counts.engines,
            cars: counts.cars,
            performances: counts.performances,
        }
    }
}

/// A row that was skipped, identified by its file line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowFailureResponse {
    /// 1-based line in the CSV file; the header is line 1.
    #[schema(example = 17)]
    pub row: u64,
    /// Reason the row was rolled back.
    #[schema(example = "missing required column 'Company Names'")]
    pub message: String,
}

impl From<RowFailure> for RowFailureResponse {
    fn from(failure: RowFailure) -> Self {
        Self {
            row: failure.row,
            message: failure.message,
        }
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReportResponse {
    /// Data rows read from the file.
    pub rows_read: usize,
    /// Rows committed to the catalogue.
    pub rows_imported: usize,
    /// Records inserted per entity kind.
    pub created: CreatedCounts,
    /// Rows that were rolled back.
    pub failures: Vec<RowFailureResponse>,
}

impl From<ImportReport> for ImportReportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            rows_read: report.rows_read,
            rows_imported: report.rows_imported,
            created: report.created.into(),
            failures: report.failures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Import the configured catalogue file.
///
/// Rows that fail are skipped and listed in the report; the call itself only
/// fails when the file cannot be read or the database is unavailable.
#[utoipa::path(
    post,
    path = "/api/v1/import",
    responses(
        (status = 200, description = "Import finished", body = ImportReportResponse),
        (status = 500, description = "Catalogue file unreadable", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["import"],
    operation_id = "importCatalogue"
)]
#[post("/import")]
pub async fn import_catalogue(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let report = state.import.import_catalogue().await?;
    info!(
        rows_imported = report.rows_imported,
        failures = report.failures.len(),
        "catalogue import requested over HTTP finished"
    );
    Ok(HttpResponse::Ok().json(ImportReportResponse::from(report)))
}
