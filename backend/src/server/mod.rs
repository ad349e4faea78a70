//! HTTP server assembly: routes, middleware and shared state.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use car_catalogue::Trace;
use car_catalogue::inbound::http::health::{HealthState, live, ready};
use car_catalogue::inbound::http::import::import_catalogue;
use car_catalogue::inbound::http::state::HttpState;
use car_catalogue::inbound::http::validation::{json_config, path_config};
use car_catalogue::inbound::http::{catalogue, users};

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Everything one app instance needs. Cloned into each worker.
#[derive(Clone)]
pub(crate) struct AppDependencies {
    pub(crate) health_state: web::Data<HealthState>,
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
}

/// Encrypted cookie sessions; the cookie only ever carries a user id.
fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(cookie_secure)
        .cookie_same_site(same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

pub(crate) fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = session_middleware(deps.key, deps.cookie_secure, deps.same_site);
    let app = App::new()
        .app_data(deps.health_state)
        .app_data(deps.http_state)
        .app_data(json_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .configure(catalogue::configure)
                .configure(users::configure)
                .service(import_catalogue),
        );

    #[cfg(debug_assertions)]
    let app = {
        use car_catalogue::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };
    #[cfg(not(debug_assertions))]
    let app = app.service(openapi_json);

    app
}

/// Release builds publish the document without Swagger UI.
#[cfg(not(debug_assertions))]
#[actix_web::get("/api-docs/openapi.json")]
async fn openapi_json() -> actix_web::HttpResponse {
    use utoipa::OpenApi;

    actix_web::HttpResponse::Ok().json(car_catalogue::ApiDoc::openapi())
}

/// Bind the server and flip the readiness probe.
///
/// # Errors
/// Returns the bind error when the address is unavailable.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        state,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(state),
        key,
        cookie_secure,
        same_site,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    info!(%bind_addr, "server bound, readiness probe enabled");
    Ok(server)
}
