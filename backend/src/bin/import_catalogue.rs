//! One-shot catalogue import.
//!
//! Reads the CSV named by `--import-path` (or `CATALOGUE_IMPORT_PATH`) into
//! the database at `CATALOGUE_DATABASE_URL` and prints the JSON report on
//! stdout. Skipped rows are listed in the report; the process only exits
//! non-zero when the file cannot be read or the database is unavailable.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use car_catalogue::config::AppSettings;
use car_catalogue::domain::catalogue_import::CatalogueImportService;
use car_catalogue::domain::ports::CatalogueImportCommand;
use car_catalogue::inbound::http::import::ImportReportResponse;
use car_catalogue::outbound::catalogue_csv::CsvCatalogueSource;
use car_catalogue::outbound::persistence::{
    DbPool, DieselCatalogueImportStore, PoolConfig, run_migrations,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?;
    run_migrations(database_url)
        .await
        .wrap_err("failed to apply migrations")?;

    // One connection is enough: the whole run is a single transaction.
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .wrap_err("failed to connect to the database")?;
    let path = settings.import_path();
    info!(path = %path.display(), "importing catalogue");

    let service = CatalogueImportService::new(
        Arc::new(CsvCatalogueSource),
        Arc::new(DieselCatalogueImportStore::new(pool)),
        path,
    );
    let report = service
        .import_catalogue()
        .await
        .map_err(|err| eyre!("catalogue import failed: {}", err.message()))?;

    let json = serde_json::to_string_pretty(&ImportReportResponse::from(report))
        .wrap_err("failed to serialise the import report")?;
    println!("{json}");
    Ok(())
}
