//! Catalogue CRUD endpoints.
//!
//! ```text
//! GET|POST /api/v1/{companies,fuel-types,engines,cars,performance}
//! GET /api/v1/{collection}/search?q=
//! GET|PUT|DELETE /api/v1/{collection}/{id}
//! ```
//!
//! Each collection registers its search route before `{id}` so `search` is
//! never parsed as an identifier.

use actix_web::web;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Error;

/// `?q=` query string shared by every search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring, or for performance a minimum top speed. Missing means
    /// match everything.
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn text(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

pub(crate) fn not_found(label: &str, id: i32) -> Error {
    Error::not_found(format!("{label} {id} not found"))
}

/// Register every catalogue route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use super::{cars, engines, performance, references};

    cfg.service(references::list_companies)
        .service(references::create_company)
        .service(references::search_companies)
        .service(references::get_company)
        .service(references::update_company)
        .service(references::delete_company)
        .service(references::list_fuel_types)
        .service(references::create_fuel_type)
        .service(references::search_fuel_types)
        .service(references::get_fuel_type)
        .service(references::update_fuel_type)
        .service(references::delete_fuel_type)
        .service(engines::list_engines)
        .service(engines::create_engine)
        .service(engines::search_engines)
        .service(engines::get_engine)
        .service(engines::update_engine)
        .service(engines::delete_engine)
        .service(cars::list_cars)
        .service(cars::create_car)
        .service(cars::search_cars)
        .service(cars::get_car)
        .service(cars::update_car)
        .service(cars::delete_car)
        .service(performance::list_performance)
        .service(performance::create_performance)
        .service(performance::search_performance)
        .service(performance::get_performance)
        .service(performance::update_performance)
        .service(performance::delete_performance);
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
