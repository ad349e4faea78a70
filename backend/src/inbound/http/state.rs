//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CarRepository, CatalogueImportCommand, EngineRepository, LoginService,
    PerformanceRepository, ReferenceRepository, UserRegistration, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use car_catalogue::inbound::http::state::HttpState;
/// use car_catalogue::test_support::InMemoryCatalogue;
///
/// # fn build(import: Arc<dyn car_catalogue::domain::ports::CatalogueImportCommand>) {
/// let store = Arc::new(InMemoryCatalogue::new());
/// let accounts = Arc::new(car_catalogue::domain::UserAccountService::new(store.clone()));
/// let state = HttpState {
///     references: store.clone(),
///     engines: store.clone(),
///     cars: store.clone(),
///     performance: store,
///     import,
///     login: accounts.clone(),
///     registration: accounts.clone(),
///     users: accounts,
/// };
/// # let _ = state;
/// # }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub references: Arc<dyn ReferenceRepository>,
    pub engines: Arc<dyn EngineRepository>,
    pub cars: Arc<dyn CarRepository>,
    pub performance: Arc<dyn PerformanceRepository>,
    pub import: Arc<dyn CatalogueImportCommand>,
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn UserRegistration>,
    pub users: Arc<dyn UsersQuery>,
}
