//! Internal Diesel row structs.
//!
//! Never exposed outside the persistence layer; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::catalogue::{
    Car, CarDraft, CarId, CarPatch, Engine, EngineDraft, EngineId, EnginePatch, Performance,
    PerformanceDraft, PerformanceId, PerformancePatch, Quantity, ReferenceId, SeatCount,
};

use super::schema::{cars, engines, performance, users};

/// Non-negative `INTEGER` column value read back as a domain count.
fn from_db(value: Option<i32>) -> Option<u32> {
    value.and_then(|raw| u32::try_from(raw).ok())
}

fn quantity_to_db(value: Option<Quantity>) -> Option<i32> {
    value.map(Quantity::as_i32)
}

fn patch_to_db(value: Option<Option<Quantity>>) -> Option<Option<i32>> {
    value.map(quantity_to_db)
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = engines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EngineRow {
    pub id: i32,
    pub engine_type: String,
    pub cc: Option<i32>,
    pub horsepower: Option<i32>,
    pub torque: Option<i32>,
}

impl From<EngineRow> for Engine {
    fn from(row: EngineRow) -> Self {
        Self {
            id: EngineId::new(row.id),
            engine_type: row.engine_type,
            cc: from_db(row.cc),
            horsepower: from_db(row.horsepower),
            torque: from_db(row.torque),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = engines)]
pub(crate) struct NewEngineRow<'a> {
    pub engine_type: &'a str,
    pub cc: Option<i32>,
    pub horsepower: Option<i32>,
    pub torque: Option<i32>,
}

impl<'a> From<&'a EngineDraft> for NewEngineRow<'a> {
    fn from(draft: &'a EngineDraft) -> Self {
        Self {
            engine_type: draft.engine_type.as_str(),
            cc: quantity_to_db(draft.cc),
            horsepower: quantity_to_db(draft.horsepower),
            torque: quantity_to_db(draft.torque),
        }
    }
}

/// `None` leaves a column alone; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = engines)]
pub(crate) struct EngineChangeset<'a> {
    pub engine_type: Option<&'a str>,
    pub cc: Option<Option<i32>>,
    pub horsepower: Option<Option<i32>>,
    pub torque: Option<Option<i32>>,
}

impl<'a> EngineChangeset<'a> {
    pub fn from_patch(patch: &'a EnginePatch) -> Option<Self> {
        let changeset = Self {
            engine_type: patch.engine_type.as_ref().map(|value| value.as_str()),
            cc: patch_to_db(patch.cc),
            horsepower: patch_to_db(patch.horsepower),
            torque: patch_to_db(patch.torque),
        };
        let empty = changeset.engine_type.is_none()
            && changeset.cc.is_none()
            && changeset.horsepower.is_none()
            && changeset.torque.is_none();
        (!empty).then_some(changeset)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarRow {
    pub id: i32,
    pub name: String,
    pub company_id: i32,
    pub engine_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub price: Option<i32>,
    pub seats: Option<i32>,
}

/// A car row with the joined company and fuel type names.
pub(crate) type JoinedCarRow = (CarRow, String, Option<String>);

pub(crate) fn car_from_joined((row, company_name, fuel_type_name): JoinedCarRow) -> Car {
    Car {
        id: CarId::new(row.id),
        name: row.name,
        company_id: ReferenceId::new(row.company_id),
        company_name,
        engine_id: row.engine_id.map(EngineId::new),
        fuel_type_id: row.fuel_type_id.map(ReferenceId::new),
        fuel_type_name,
        price: from_db(row.price),
        seats: from_db(row.seats),
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cars)]
pub(crate) struct NewCarRow<'a> {
    pub name: &'a str,
    pub company_id: i32,
    pub engine_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub price: Option<i32>,
    pub seats: Option<i32>,
}

impl<'a> From<&'a CarDraft> for NewCarRow<'a> {
    fn from(draft: &'a CarDraft) -> Self {
        Self {
            name: draft.name.as_str(),
            company_id: draft.company_id.get(),
            engine_id: draft.engine_id.map(EngineId::get),
            fuel_type_id: draft.fuel_type_id.map(ReferenceId::get),
            price: quantity_to_db(draft.price),
            seats: draft.seats.map(SeatCount::as_i32),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cars)]
pub(crate) struct CarChangeset<'a> {
    pub name: Option<&'a str>,
    pub company_id: Option<i32>,
    pub engine_id: Option<Option<i32>>,
    pub fuel_type_id: Option<Option<i32>>,
    pub price: Option<Option<i32>>,
    pub seats: Option<Option<i32>>,
}

impl<'a> CarChangeset<'a> {
    pub fn from_patch(patch: &'a CarPatch) -> Option<Self> {
        let changeset = Self {
            name: patch.name.as_ref().map(|value| value.as_str()),
            company_id: patch.company_id.map(ReferenceId::get),
            engine_id: patch.engine_id.map(|value| value.map(EngineId::get)),
            fuel_type_id: patch.fuel_type_id.map(|value| value.map(ReferenceId::get)),
            price: patch_to_db(patch.price),
            seats: patch.seats.map(|value| value.map(SeatCount::as_i32)),
        };
        let empty = changeset.name.is_none()
            && changeset.company_id.is_none()
            && changeset.engine_id.is_none()
            && changeset.fuel_type_id.is_none()
            && changeset.price.is_none()
            && changeset.seats.is_none();
        (!empty).then_some(changeset)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = performance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PerformanceRow {
    pub id: i32,
    pub car_id: i32,
    pub top_speed: Option<i32>,
    pub acceleration_0_100: Option<f64>,
}

impl From<PerformanceRow> for Performance {
    fn from(row: PerformanceRow) -> Self {
        Self {
            id: PerformanceId::new(row.id),
            car_id: CarId::new(row.car_id),
            top_speed: from_db(row.top_speed),
            acceleration_0_100: row.acceleration_0_100,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = performance)]
pub(crate) struct NewPerformanceRow {
    pub car_id: i32,
    pub top_speed: Option<i32>,
    pub acceleration_0_100: Option<f64>,
}

impl From<&PerformanceDraft> for NewPerformanceRow {
    fn from(draft: &PerformanceDraft) -> Self {
        Self {
            car_id: draft.car_id.get(),
            top_speed: quantity_to_db(draft.top_speed),
            acceleration_0_100: draft.acceleration_0_100.map(|value| value.seconds()),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = performance)]
pub(crate) struct PerformanceChangeset {
    pub top_speed: Option<Option<i32>>,
    pub acceleration_0_100: Option<Option<f64>>,
}

impl PerformanceChangeset {
    pub fn from_patch(patch: &PerformancePatch) -> Option<Self> {
        let changeset = Self {
            top_speed: patch_to_db(patch.top_speed),
            acceleration_0_100: patch
                .acceleration_0_100
                .map(|value| value.map(|seconds| seconds.seconds())),
        };
        let empty = changeset.top_speed.is_none() && changeset.acceleration_0_100.is_none();
        (!empty).then_some(changeset)
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}
