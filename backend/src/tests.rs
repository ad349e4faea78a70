//! Tests for the application bootstrap, covering readiness signalling and
//! route wiring.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use car_catalogue::domain::UserAccountService;
use car_catalogue::domain::catalogue_import::CatalogueImportService;
use car_catalogue::inbound::http::health::HealthState;
use car_catalogue::inbound::http::session_config::SessionSettings;
use car_catalogue::inbound::http::state::HttpState;
use car_catalogue::outbound::catalogue_csv::CsvCatalogueSource;
use car_catalogue::test_support::{CatalogueCsvFixture, InMemoryCatalogue, catalogue_line};

use super::server::{AppDependencies, ServerConfig, build_app, create_server};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

fn in_memory_state(store: &InMemoryCatalogue, import_path: PathBuf) -> HttpState {
    let store = Arc::new(store.clone());
    let accounts = Arc::new(UserAccountService::new(store.clone()));
    HttpState {
        references: store.clone(),
        engines: store.clone(),
        cars: store.clone(),
        import: Arc::new(CatalogueImportService::new(
            Arc::new(CsvCatalogueSource),
            store.clone(),
            import_path,
        )),
        performance: store,
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
    }
}

fn dependencies(health_state: web::Data<HealthState>, state: HttpState) -> AppDependencies {
    AppDependencies {
        health_state,
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

#[rstest]
#[actix_web::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
    assert!(!health_state.is_ready(), "state should start unready");
    let store = InMemoryCatalogue::new();
    let config = ServerConfig::new(
        SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        },
        "127.0.0.1:0".parse().expect("literal address"),
        in_memory_state(&store, PathBuf::from("missing.csv")),
    );
    assert_eq!(config.bind_addr().port(), 0);

    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_web::test]
async fn import_route_reports_created_rows(health_state: web::Data<HealthState>) {
    let fixture = CatalogueCsvFixture::from_lines([
        catalogue_line([
            "Tesla", "Model S", "Electric", "", "1020 hp", "322 km/h", "2.1 sec", "$89,990",
            "Electric", "5", "1390 Nm",
        ]),
        catalogue_line([
            "", "Nameless", "V6", "", "", "", "", "", "Petrol", "4", "",
        ]),
    ])
    .expect("fixture written");
    let store = InMemoryCatalogue::new();
    let app = actix_test::init_service(build_app(dependencies(
        health_state,
        in_memory_state(&store, fixture.path().to_path_buf()),
    )))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/import")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["rowsRead"], json!(2));
    assert_eq!(body["rowsImported"], json!(1));
    assert_eq!(body["created"]["cars"], json!(1));
    assert_eq!(body["failures"][0]["row"], json!(3));
    assert_eq!(store.cars().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn missing_import_file_is_a_redacted_server_error(health_state: web::Data<HealthState>) {
    let store = InMemoryCatalogue::new();
    let app = actix_test::init_service(build_app(dependencies(
        health_state,
        in_memory_state(&store, PathBuf::from("/nonexistent/cars.csv")),
    )))
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/import")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("internal_error"));
    assert_eq!(body["message"], json!("Internal server error"));
    assert!(store.companies().is_empty());
}

#[rstest]
#[case("/health/live", StatusCode::OK)]
#[case("/api/v1/companies", StatusCode::OK)]
#[case("/api/v1/users/me", StatusCode::UNAUTHORIZED)]
#[case("/api-docs/openapi.json", StatusCode::OK)]
#[actix_web::test]
async fn routes_are_mounted(
    health_state: web::Data<HealthState>,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let store = InMemoryCatalogue::new();
    let app = actix_test::init_service(build_app(dependencies(
        health_state,
        in_memory_state(&store, PathBuf::from("missing.csv")),
    )))
    .await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;

    assert_eq!(res.status(), expected, "GET {uri}");
}
