//! Builders wiring Diesel adapters and domain services into [`HttpState`].

use std::path::PathBuf;
use std::sync::Arc;

use car_catalogue::domain::UserAccountService;
use car_catalogue::domain::catalogue_import::CatalogueImportService;
use car_catalogue::domain::ports::CatalogueImportCommand;
use car_catalogue::inbound::http::state::HttpState;
use car_catalogue::outbound::catalogue_csv::CsvCatalogueSource;
use car_catalogue::outbound::persistence::{
    DbPool, DieselCarRepository, DieselCatalogueImportStore, DieselEngineRepository,
    DieselPerformanceRepository, DieselReferenceRepository, DieselUserRepository,
};

/// Import command reading `import_path` through the CSV adapter.
fn build_import_command(pool: &DbPool, import_path: PathBuf) -> Arc<dyn CatalogueImportCommand> {
    Arc::new(CatalogueImportService::new(
        Arc::new(CsvCatalogueSource),
        Arc::new(DieselCatalogueImportStore::new(pool.clone())),
        import_path,
    ))
}

/// Handler state backed by PostgreSQL.
pub fn build_http_state(pool: &DbPool, import_path: PathBuf) -> HttpState {
    let accounts = Arc::new(UserAccountService::new(Arc::new(DieselUserRepository::new(
        pool.clone(),
    ))));
    HttpState {
        references: Arc::new(DieselReferenceRepository::new(pool.clone())),
        engines: Arc::new(DieselEngineRepository::new(pool.clone())),
        cars: Arc::new(DieselCarRepository::new(pool.clone())),
        performance: Arc::new(DieselPerformanceRepository::new(pool.clone())),
        import: build_import_command(pool, import_path),
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
    }
}
