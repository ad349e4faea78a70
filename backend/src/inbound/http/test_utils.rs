//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::UserAccountService;
use crate::domain::ports::{CatalogueImportCommand, MockCatalogueImportCommand};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_config, path_config};
use crate::middleware::Trace;
use crate::test_support::InMemoryCatalogue;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state backed entirely by `store`.
pub fn in_memory_state(
    store: &InMemoryCatalogue,
    import: Arc<dyn CatalogueImportCommand>,
) -> HttpState {
    let store = Arc::new(store.clone());
    let accounts = Arc::new(UserAccountService::new(store.clone()));
    HttpState {
        references: store.clone(),
        engines: store.clone(),
        cars: store.clone(),
        performance: store,
        import,
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
    }
}

/// An import command that must never run.
pub fn unused_import() -> Arc<dyn CatalogueImportCommand> {
    let mut import = MockCatalogueImportCommand::new();
    import.expect_import_catalogue().never();
    Arc::new(import)
}

/// `/api/v1` application with the production extractor configuration.
pub fn api_app(
    state: HttpState,
    routes: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(routes),
        )
}
