//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the request
//! and response DTOs, and the domain error wrappers from
//! [`crate::inbound::http::schemas`]. The session cookie scheme is declared
//! for the account routes that read it.
//!
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::cars::{CarRequest, CarResponse, CarUpdateRequest};
use crate::inbound::http::engines::{EngineRequest, EngineResponse, EngineUpdateRequest};
use crate::inbound::http::import::{CreatedCounts, ImportReportResponse, RowFailureResponse};
use crate::inbound::http::performance::{
    PerformanceRequest, PerformanceResponse, PerformanceUpdateRequest,
};
use crate::inbound::http::references::{ReferenceRequest, ReferenceResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Car catalogue API",
        description = "Companies, fuel types, engines, cars and performance figures, \
                       with a bulk CSV import and session-based accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::references::list_companies,
        crate::inbound::http::references::create_company,
        crate::inbound::http::references::search_companies,
        crate::inbound::http::references::get_company,
        crate::inbound::http::references::update_company,
        crate::inbound::http::references::delete_company,
        crate::inbound::http::references::list_fuel_types,
        crate::inbound::http::references::create_fuel_type,
        crate::inbound::http::references::search_fuel_types,
        crate::inbound::http::references::get_fuel_type,
        crate::inbound::http::references::update_fuel_type,
        crate::inbound::http::references::delete_fuel_type,
        crate::inbound::http::engines::list_engines,
        crate::inbound::http::engines::create_engine,
        crate::inbound::http::engines::search_engines,
        crate::inbound::http::engines::get_engine,
        crate::inbound::http::engines::update_engine,
        crate::inbound::http::engines::delete_engine,
        crate::inbound::http::cars::list_cars,
        crate::inbound::http::cars::create_car,
        crate::inbound::http::cars::search_cars,
        crate::inbound::http::cars::get_car,
        crate::inbound::http::cars::update_car,
        crate::inbound::http::cars::delete_car,
        crate::inbound::http::performance::list_performance,
        crate::inbound::http::performance::create_performance,
        crate::inbound::http::performance::search_performance,
        crate::inbound::http::performance::get_performance,
        crate::inbound::http::performance::update_performance,
        crate::inbound::http::performance::delete_performance,
        crate::inbound::http::import::import_catalogue,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ReferenceRequest,
        ReferenceResponse,
        EngineRequest,
        EngineUpdateRequest,
        EngineResponse,
        CarRequest,
        CarUpdateRequest,
        CarResponse,
        PerformanceRequest,
        PerformanceUpdateRequest,
        PerformanceResponse,
        CreatedCounts,
        RowFailureResponse,
        ImportReportResponse,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "companies", description = "Car manufacturers"),
        (name = "fuel-types", description = "Fuel type lookup"),
        (name = "engines", description = "Engine specifications"),
        (name = "cars", description = "Car models"),
        (name = "performance", description = "Top speed and acceleration"),
        (name = "import", description = "Bulk CSV catalogue import"),
        (name = "users", description = "Accounts and sessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("ImportReportResponse", "rowsRead", "Data rows read from the file.")]
    #[case("RowFailureResponse", "row", "1-based line in the CSV file; the header is line 1.")]
    #[case("CreatedCounts", "companies", "Companies inserted by this run.")]
    fn import_report_fields_are_described(
        #[case] schema: &str,
        #[case] field: &str,
        #[case] description: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("document serialises");
        let actual = doc
            .pointer(&format!(
                "/components/schemas/{schema}/properties/{field}/description"
            ))
            .and_then(serde_json::Value::as_str);
        assert_eq!(actual, Some(description));
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    #[case("EngineResponse", "type")]
    #[case("CarResponse", "companyId")]
    #[case("PerformanceResponse", "acceleration0100")]
    #[case("ImportReportResponse", "rowsImported")]
    #[case("UserResponse", "createdAt")]
    fn dto_schemas_use_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/companies/search")]
    #[case("/api/v1/fuel-types/{id}")]
    #[case("/api/v1/cars/{id}")]
    #[case("/api/v1/performance/search")]
    #[case("/api/v1/import")]
    #[case("/api/v1/users/me")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
