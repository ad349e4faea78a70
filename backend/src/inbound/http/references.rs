//! Company and fuel type endpoints.
//!
//! Both collections share one repository port keyed by [`ReferenceKind`];
//! the handlers here only pick the kind and the route.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::catalogue::{NamedReference, ReferenceId, ReferenceKind, ReferenceName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{SearchQuery, not_found};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::required;

/// A company or fuel type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Toyota")]
    pub name: String,
}

impl From<NamedReference> for ReferenceResponse {
    fn from(reference: NamedReference) -> Self {
        Self {
            id: reference.id.get(),
            name: reference.name,
        }
    }
}

/// Body for creating or renaming a company or fuel type.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRequest {
    #[schema(example = "Toyota")]
    pub name: Option<String>,
}

fn parse_name(kind: ReferenceKind, request: ReferenceRequest) -> ApiResult<ReferenceName> {
    let raw = required(request.name, "name")?;
    Ok(ReferenceName::new(kind, &raw)?)
}

async fn list(state: &HttpState, kind: ReferenceKind) -> ApiResult<HttpResponse> {
    let items = state.references.list(kind).await?;
    let body: Vec<ReferenceResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create(
    state: &HttpState,
    kind: ReferenceKind,
    request: ReferenceRequest,
) -> ApiResult<HttpResponse> {
    let name = parse_name(kind, request)?;
    let created = state.references.create(kind, &name).await?;
    debug!(kind = kind.label(), id = %created.id, "created reference");
    Ok(HttpResponse::Created().json(ReferenceResponse::from(created)))
}

async fn search(state: &HttpState, kind: ReferenceKind, query: &SearchQuery) -> ApiResult<HttpResponse> {
    let items = state.references.search(kind, query.text()).await?;
    let body: Vec<ReferenceResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_one(state: &HttpState, kind: ReferenceKind, id: i32) -> ApiResult<HttpResponse> {
    let found = state
        .references
        .find(kind, ReferenceId::new(id))
        .await?
        .ok_or_else(|| not_found(kind.label(), id))?;
    Ok(HttpResponse::Ok().json(ReferenceResponse::from(found)))
}

async fn rename(
    state: &HttpState,
    kind: ReferenceKind,
    id: i32,
    request: ReferenceRequest,
) -> ApiResult<HttpResponse> {
    let name = parse_name(kind, request)?;
    let renamed = state
        .references
        .rename(kind, ReferenceId::new(id), &name)
        .await?
        .ok_or_else(|| not_found(kind.label(), id))?;
    Ok(HttpResponse::Ok().json(ReferenceResponse::from(renamed)))
}

async fn remove(state: &HttpState, kind: ReferenceKind, id: i32) -> ApiResult<HttpResponse> {
    if !state.references.delete(kind, ReferenceId::new(id)).await? {
        return Err(not_found(kind.label(), id));
    }
    debug!(kind = kind.label(), id, "deleted reference");
    Ok(HttpResponse::NoContent().finish())
}

/// List companies.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    responses(
        (status = 200, description = "All companies", body = [ReferenceResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, ReferenceKind::Company).await
}

/// Create a company.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    request_body = ReferenceRequest,
    responses(
        (status = 201, description = "Company created", body = ReferenceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already exists", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/companies")]
pub async fn create_company(
    state: web::Data<HttpState>,
    payload: web::Json<ReferenceRequest>,
) -> ApiResult<HttpResponse> {
    create(&state, ReferenceKind::Company, payload.into_inner()).await
}

/// Case-insensitive substring search over company names.
#[utoipa::path(
    get,
    path = "/api/v1/companies/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching companies", body = [ReferenceResponse])),
    tags = ["companies"],
    operation_id = "searchCompanies"
)]
#[get("/companies/search")]
pub async fn search_companies(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    search(&state, ReferenceKind::Company, &query).await
}

/// Fetch one company.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = ReferenceResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "getCompany"
)]
#[get("/companies/{id}")]
pub async fn get_company(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    get_one(&state, ReferenceKind::Company, path.into_inner()).await
}

/// Rename a company.
#[utoipa::path(
    put,
    path = "/api/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    request_body = ReferenceRequest,
    responses(
        (status = 200, description = "Company renamed", body = ReferenceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already exists", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "updateCompany"
)]
#[put("/companies/{id}")]
pub async fn update_company(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<ReferenceRequest>,
) -> ApiResult<HttpResponse> {
    rename(&state, ReferenceKind::Company, path.into_inner(), payload.into_inner()).await
}

/// Delete a company that no car references.
#[utoipa::path(
    delete,
    path = "/api/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Still referenced by cars", body = ErrorSchema)
    ),
    tags = ["companies"],
    operation_id = "deleteCompany"
)]
#[delete("/companies/{id}")]
pub async fn delete_company(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    remove(&state, ReferenceKind::Company, path.into_inner()).await
}

/// List fuel types.
#[utoipa::path(
    get,
    path = "/api/v1/fuel-types",
    responses(
        (status = 200, description = "All fuel types", body = [ReferenceResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["fuel-types"],
    operation_id = "listFuelTypes"
)]
#[get("/fuel-types")]
pub async fn list_fuel_types(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    list(&state, ReferenceKind::FuelType).await
}

/// Create a fuel type.
#[utoipa::path(
    post,
    path = "/api/v1/fuel-types",
    request_body = ReferenceRequest,
    responses(
        (status = 201, description = "Fuel type created", body = ReferenceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already exists", body = ErrorSchema)
    ),
    tags = ["fuel-types"],
    operation_id = "createFuelType"
)]
#[post("/fuel-types")]
pub async fn create_fuel_type(
    state: web::Data<HttpState>,
    payload: web::Json<ReferenceRequest>,
) -> ApiResult<HttpResponse> {
    create(&state, ReferenceKind::FuelType, payload.into_inner()).await
}

/// Case-insensitive substring search over fuel type names.
#[utoipa::path(
    get,
    path = "/api/v1/fuel-types/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching fuel types", body = [ReferenceResponse])),
    tags = ["fuel-types"],
    operation_id = "searchFuelTypes"
)]
#[get("/fuel-types/search")]
pub async fn search_fuel_types(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    search(&state, ReferenceKind::FuelType, &query).await
}

/// Fetch one fuel type.
#[utoipa::path(
    get,
    path = "/api/v1/fuel-types/{id}",
    params(("id" = i32, Path, description = "Fuel type id")),
    responses(
        (status = 200, description = "Fuel type", body = ReferenceResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["fuel-types"],
    operation_id = "getFuelType"
)]
#[get("/fuel-types/{id}")]
pub async fn get_fuel_type(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    get_one(&state, ReferenceKind::FuelType, path.into_inner()).await
}

/// Rename a fuel type.
#[utoipa::path(
    put,
    path = "/api/v1/fuel-types/{id}",
    params(("id" = i32, Path, description = "Fuel type id")),
    request_body = ReferenceRequest,
    responses(
        (status = 200, description = "Fuel type renamed", body = ReferenceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Name already exists", body = ErrorSchema)
    ),
    tags = ["fuel-types"],
    operation_id = "updateFuelType"
)]
#[put("/fuel-types/{id}")]
pub async fn update_fuel_type(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<ReferenceRequest>,
) -> ApiResult<HttpResponse> {
    rename(&state, ReferenceKind::FuelType, path.into_inner(), payload.into_inner()).await
}

/// Delete a fuel type; cars using it keep existing without one.
#[utoipa::path(
    delete,
    path = "/api/v1/fuel-types/{id}",
    params(("id" = i32, Path, description = "Fuel type id")),
    responses(
        (status = 204, description = "Fuel type deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["fuel-types"],
    operation_id = "deleteFuelType"
)]
#[delete("/fuel-types/{id}")]
pub async fn delete_fuel_type(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    remove(&state, ReferenceKind::FuelType, path.into_inner()).await
}
