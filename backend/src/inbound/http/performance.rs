//! Performance endpoints.
//!
//! Search here is numeric: `?q=250` returns records with a top speed of at
//! least 250 km/h, and a query that is not an integer returns everything.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalogue::{
    Acceleration, CarId, CatalogueValidationError, Performance, PerformanceDraft, PerformanceId,
    PerformancePatch, PerformanceSearch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{SearchQuery, not_found};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{present, quantity, quantity_patch, required};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    #[schema(example = 4)]
    pub id: i32,
    pub car_id: i32,
    /// Top speed in km/h.
    #[schema(example = 322)]
    pub top_speed: Option<u32>,
    /// Seconds from 0 to 100 km/h.
    #[serde(rename = "acceleration0100")]
    #[schema(example = 2.1)]
    pub acceleration_0_100: Option<f64>,
}

impl From<Performance> for PerformanceResponse {
    fn from(performance: Performance) -> Self {
        Self {
            id: performance.id.get(),
            car_id: performance.car_id.get(),
            top_speed: performance.top_speed,
            acceleration_0_100: performance.acceleration_0_100,
        }
    }
}

/// Performance create body; `carId` is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    pub car_id: Option<i32>,
    pub top_speed: Option<i64>,
    #[serde(rename = "acceleration0100")]
    pub acceleration_0_100: Option<f64>,
}

/// Performance update body; `null` clears a measurement.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceUpdateRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub top_speed: Option<Option<i64>>,
    #[serde(rename = "acceleration0100", default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>, nullable)]
    pub acceleration_0_100: Option<Option<f64>>,
}

fn acceleration(value: Option<f64>) -> Result<Option<Acceleration>, CatalogueValidationError> {
    value.map(Acceleration::new).transpose()
}

pub(crate) fn parse_performance_request(request: PerformanceRequest) -> ApiResult<PerformanceDraft> {
    let car_id = required(request.car_id, "carId")?;
    Ok(PerformanceDraft {
        car_id: CarId::new(car_id),
        top_speed: quantity("topSpeed", request.top_speed)?,
        acceleration_0_100: acceleration(request.acceleration_0_100)?,
    })
}

pub(crate) fn parse_performance_update(
    request: PerformanceUpdateRequest,
) -> ApiResult<PerformancePatch> {
    Ok(PerformancePatch {
        top_speed: quantity_patch("topSpeed", request.top_speed)?,
        acceleration_0_100: request
            .acceleration_0_100
            .map(acceleration)
            .transpose()?,
    })
}

fn respond_all(records: Vec<Performance>) -> HttpResponse {
    let body: Vec<PerformanceResponse> = records.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(body)
}

/// List performance records.
#[utoipa::path(
    get,
    path = "/api/v1/performance",
    responses(
        (status = 200, description = "All performance records", body = [PerformanceResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["performance"],
    operation_id = "listPerformance"
)]
#[get("/performance")]
pub async fn list_performance(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(respond_all(state.performance.list().await?))
}

/// Record a car's performance; each car has at most one record.
#[utoipa::path(
    post,
    path = "/api/v1/performance",
    request_body = PerformanceRequest,
    responses(
        (status = 201, description = "Performance created", body = PerformanceResponse),
        (status = 400, description = "Invalid request or unknown car", body = ErrorSchema),
        (status = 409, description = "Car already has a record", body = ErrorSchema)
    ),
    tags = ["performance"],
    operation_id = "createPerformance"
)]
#[post("/performance")]
pub async fn create_performance(
    state: web::Data<HttpState>,
    payload: web::Json<PerformanceRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_performance_request(payload.into_inner())?;
    let created = state.performance.create(&draft).await?;
    Ok(HttpResponse::Created().json(PerformanceResponse::from(created)))
}

/// Records with a top speed at or above `q`.
#[utoipa::path(
    get,
    path = "/api/v1/performance/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching records", body = [PerformanceResponse])),
    tags = ["performance"],
    operation_id = "searchPerformance"
)]
#[get("/performance/search")]
pub async fn search_performance(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let filter = PerformanceSearch::parse(query.text());
    Ok(respond_all(state.performance.search(filter).await?))
}

/// Fetch one performance record.
#[utoipa::path(
    get,
    path = "/api/v1/performance/{id}",
    params(("id" = i32, Path, description = "Performance id")),
    responses(
        (status = 200, description = "Performance record", body = PerformanceResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["performance"],
    operation_id = "getPerformance"
)]
#[get("/performance/{id}")]
pub async fn get_performance(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let record = state
        .performance
        .find(PerformanceId::new(id))
        .await?
        .ok_or_else(|| not_found("performance record", id))?;
    Ok(HttpResponse::Ok().json(PerformanceResponse::from(record)))
}

/// Partially update a performance record.
#[utoipa::path(
    put,
    path = "/api/v1/performance/{id}",
    params(("id" = i32, Path, description = "Performance id")),
    request_body = PerformanceUpdateRequest,
    responses(
        (status = 200, description = "Performance updated", body = PerformanceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["performance"],
    operation_id = "updatePerformance"
)]
#[put("/performance/{id}")]
pub async fn update_performance(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<PerformanceUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let patch = parse_performance_update(payload.into_inner())?;
    let record = state
        .performance
        .update(PerformanceId::new(id), &patch)
        .await?
        .ok_or_else(|| not_found("performance record", id))?;
    Ok(HttpResponse::Ok().json(PerformanceResponse::from(record)))
}

/// Delete a performance record.
#[utoipa::path(
    delete,
    path = "/api/v1/performance/{id}",
    params(("id" = i32, Path, description = "Performance id")),
    responses(
        (status = 204, description = "Performance deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["performance"],
    operation_id = "deletePerformance"
)]
#[delete("/performance/{id}")]
pub async fn delete_performance(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.performance.delete(PerformanceId::new(id)).await? {
        return Err(not_found("performance record", id));
    }
    Ok(HttpResponse::NoContent().finish())
}
