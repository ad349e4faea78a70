//! Engine endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::catalogue::{Engine, EngineDraft, EngineId, EnginePatch, EngineType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{SearchQuery, not_found};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{present, quantity, quantity_patch, required};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineResponse {
    #[schema(example = 3)]
    pub id: i32,
    /// Engine description as listed in the catalogue.
    #[serde(rename = "type")]
    #[schema(example = "V8")]
    pub engine_type: String,
    /// Displacement in cc, or battery capacity.
    #[schema(example = 3996)]
    pub cc: Option<u32>,
    #[schema(example = 630)]
    pub horsepower: Option<u32>,
    /// Torque in Nm.
    #[schema(example = 800)]
    pub torque: Option<u32>,
}

impl From<Engine> for EngineResponse {
    fn from(engine: Engine) -> Self {
        Self {
            id: engine.id.get(),
            engine_type: engine.engine_type,
            cc: engine.cc,
            horsepower: engine.horsepower,
            torque: engine.torque,
        }
    }
}

/// Engine create body; `type` is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineRequest {
    #[serde(rename = "type")]
    pub engine_type: Option<String>,
    pub cc: Option<i64>,
    pub horsepower: Option<i64>,
    pub torque: Option<i64>,
}

/// Engine update body.
///
/// Omitted fields are left untouched and `null` clears a measurement. A blank
/// `type` is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngineUpdateRequest {
    #[serde(rename = "type")]
    pub engine_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub cc: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub horsepower: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub torque: Option<Option<i64>>,
}

pub(crate) fn parse_engine_request(request: EngineRequest) -> ApiResult<EngineDraft> {
    let raw_type = required(request.engine_type, "type")?;
    Ok(EngineDraft {
        engine_type: EngineType::new(&raw_type)?,
        cc: quantity("cc", request.cc)?,
        horsepower: quantity("horsepower", request.horsepower)?,
        torque: quantity("torque", request.torque)?,
    })
}

pub(crate) fn parse_engine_update(request: EngineUpdateRequest) -> ApiResult<EnginePatch> {
    let engine_type = request
        .engine_type
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| EngineType::new(&raw))
        .transpose()?;
    Ok(EnginePatch {
        engine_type,
        cc: quantity_patch("cc", request.cc)?,
        horsepower: quantity_patch("horsepower", request.horsepower)?,
        torque: quantity_patch("torque", request.torque)?,
    })
}

fn respond_all(engines: Vec<Engine>) -> HttpResponse {
    let body: Vec<EngineResponse> = engines.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(body)
}

/// List engines.
#[utoipa::path(
    get,
    path = "/api/v1/engines",
    responses(
        (status = 200, description = "All engines", body = [EngineResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["engines"],
    operation_id = "listEngines"
)]
#[get("/engines")]
pub async fn list_engines(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(respond_all(state.engines.list().await?))
}

/// Create an engine.
#[utoipa::path(
    post,
    path = "/api/v1/engines",
    request_body = EngineRequest,
    responses(
        (status = 201, description = "Engine created", body = EngineResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["engines"],
    operation_id = "createEngine"
)]
#[post("/engines")]
pub async fn create_engine(
    state: web::Data<HttpState>,
    payload: web::Json<EngineRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_engine_request(payload.into_inner())?;
    let engine = state.engines.create(&draft).await?;
    debug!(id = %engine.id, "created engine");
    Ok(HttpResponse::Created().json(EngineResponse::from(engine)))
}

/// Case-insensitive substring search over engine types.
#[utoipa::path(
    get,
    path = "/api/v1/engines/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching engines", body = [EngineResponse])),
    tags = ["engines"],
    operation_id = "searchEngines"
)]
#[get("/engines/search")]
pub async fn search_engines(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    Ok(respond_all(state.engines.search(query.text()).await?))
}

/// Fetch one engine.
#[utoipa::path(
    get,
    path = "/api/v1/engines/{id}",
    params(("id" = i32, Path, description = "Engine id")),
    responses(
        (status = 200, description = "Engine", body = EngineResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["engines"],
    operation_id = "getEngine"
)]
#[get("/engines/{id}")]
pub async fn get_engine(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let engine = state
        .engines
        .find(EngineId::new(id))
        .await?
        .ok_or_else(|| not_found("engine", id))?;
    Ok(HttpResponse::Ok().json(EngineResponse::from(engine)))
}

/// Partially update an engine.
#[utoipa::path(
    put,
    path = "/api/v1/engines/{id}",
    params(("id" = i32, Path, description = "Engine id")),
    request_body = EngineUpdateRequest,
    responses(
        (status = 200, description = "Engine updated", body = EngineResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["engines"],
    operation_id = "updateEngine"
)]
#[put("/engines/{id}")]
pub async fn update_engine(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<EngineUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let patch = parse_engine_update(payload.into_inner())?;
    let engine = state
        .engines
        .update(EngineId::new(id), &patch)
        .await?
        .ok_or_else(|| not_found("engine", id))?;
    Ok(HttpResponse::Ok().json(EngineResponse::from(engine)))
}

/// Delete an engine; cars using it keep existing without one.
#[utoipa::path(
    delete,
    path = "/api/v1/engines/{id}",
    params(("id" = i32, Path, description = "Engine id")),
    responses(
        (status = 204, description = "Engine deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["engines"],
    operation_id = "deleteEngine"
)]
#[delete("/engines/{id}")]
pub async fn delete_engine(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.engines.delete(EngineId::new(id)).await? {
        return Err(not_found("engine", id));
    }
    Ok(HttpResponse::NoContent().finish())
}
