//! Car endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::catalogue::{
    Car, CarDraft, CarId, CarName, CarPatch, CatalogueValidationError, EngineId, ReferenceId,
    SeatCount,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::{SearchQuery, not_found};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{present, quantity, quantity_patch, required};

/// A car with its company and fuel type names resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Model S")]
    pub name: String,
    pub company_id: i32,
    #[schema(example = "Tesla")]
    pub company: String,
    pub engine_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    #[schema(example = "Electric")]
    pub fuel_type: Option<String>,
    /// Price in whole currency units.
    #[schema(example = 89990)]
    pub price: Option<u32>,
    #[schema(example = 5)]
    pub seats: Option<u32>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id.get(),
            name: car.name,
            company_id: car.company_id.get(),
            company: car.company_name,
            engine_id: car.engine_id.map(EngineId::get),
            fuel_type_id: car.fuel_type_id.map(ReferenceId::get),
            fuel_type: car.fuel_type_name,
            price: car.price,
            seats: car.seats,
        }
    }
}

/// Car create body; `name` and `companyId` are required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    pub name: Option<String>,
    pub company_id: Option<i32>,
    pub engine_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub price: Option<i64>,
    pub seats: Option<i64>,
}

/// Car update body.
///
/// Omitted fields are left untouched; `null` clears the optional links and
/// measurements. A blank `name` is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarUpdateRequest {
    pub name: Option<String>,
    pub company_id: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>, nullable)]
    pub engine_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>, nullable)]
    pub fuel_type_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub seats: Option<Option<i64>>,
}

fn seats(value: Option<i64>) -> Result<Option<SeatCount>, CatalogueValidationError> {
    quantity("seats", value)?.map(SeatCount::new).transpose()
}

pub(crate) fn parse_car_request(request: CarRequest) -> ApiResult<CarDraft> {
    let name = required(request.name, "name")?;
    let company_id = required(request.company_id, "companyId")?;
    Ok(CarDraft {
        name: CarName::new(&name)?,
        company_id: ReferenceId::new(company_id),
        engine_id: request.engine_id.map(EngineId::new),
        fuel_type_id: request.fuel_type_id.map(ReferenceId::new),
        price: quantity("price", request.price)?,
        seats: seats(request.seats)?,
    })
}

pub(crate) fn parse_car_update(request: CarUpdateRequest) -> ApiResult<CarPatch> {
    let name = request
        .name
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| CarName::new(&raw))
        .transpose()?;
    Ok(CarPatch {
        name,
        company_id: request.company_id.map(ReferenceId::new),
        engine_id: request.engine_id.map(|id| id.map(EngineId::new)),
        fuel_type_id: request.fuel_type_id.map(|id| id.map(ReferenceId::new)),
        price: quantity_patch("price", request.price)?,
        seats: request.seats.map(seats).transpose()?,
    })
}

fn respond_all(cars: Vec<Car>) -> HttpResponse {
    let body: Vec<CarResponse> = cars.into_iter().map(Into::into).collect();
    HttpResponse::Ok().json(body)
}

/// List cars.
#[utoipa::path(
    get,
    path = "/api/v1/cars",
    responses(
        (status = 200, description = "All cars", body = [CarResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "listCars"
)]
#[get("/cars")]
pub async fn list_cars(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(respond_all(state.cars.list().await?))
}

/// Create a car.
#[utoipa::path(
    post,
    path = "/api/v1/cars",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Car created", body = CarResponse),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "createCar"
)]
#[post("/cars")]
pub async fn create_car(
    state: web::Data<HttpState>,
    payload: web::Json<CarRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_car_request(payload.into_inner())?;
    let car = state.cars.create(&draft).await?;
    debug!(id = %car.id, "created car");
    Ok(HttpResponse::Created().json(CarResponse::from(car)))
}

/// Case-insensitive substring search over car names.
#[utoipa::path(
    get,
    path = "/api/v1/cars/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching cars", body = [CarResponse])),
    tags = ["cars"],
    operation_id = "searchCars"
)]
#[get("/cars/search")]
pub async fn search_cars(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    Ok(respond_all(state.cars.search(query.text()).await?))
}

/// Fetch one car.
#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car", body = CarResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "getCar"
)]
#[get("/cars/{id}")]
pub async fn get_car(state: web::Data<HttpState>, path: web::Path<i32>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let car = state
        .cars
        .find(CarId::new(id))
        .await?
        .ok_or_else(|| not_found("car", id))?;
    Ok(HttpResponse::Ok().json(CarResponse::from(car)))
}

/// Partially update a car.
#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    request_body = CarUpdateRequest,
    responses(
        (status = 200, description = "Car updated", body = CarResponse),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "updateCar"
)]
#[put("/cars/{id}")]
pub async fn update_car(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CarUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let patch = parse_car_update(payload.into_inner())?;
    let car = state
        .cars
        .update(CarId::new(id), &patch)
        .await?
        .ok_or_else(|| not_found("car", id))?;
    Ok(HttpResponse::Ok().json(CarResponse::from(car)))
}

/// Delete a car together with its performance record.
#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    params(("id" = i32, Path, description = "Car id")),
    responses(
        (status = 204, description = "Car deleted"),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "deleteCar"
)]
#[delete("/cars/{id}")]
pub async fn delete_car(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !state.cars.delete(CarId::new(id)).await? {
        return Err(not_found("car", id));
    }
    debug!(id, "deleted car");
    Ok(HttpResponse::NoContent().finish())
}
