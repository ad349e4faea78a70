//! PostgreSQL-backed `CarRepository`.
//!
//! Reads join `companies` and `fuel_types` so every returned car carries its
//! company and fuel type names.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::catalogue::{Car, CarDraft, CarId, CarPatch};
use crate::domain::ports::{CarRepository, CatalogueRepositoryError};

use super::error_mapping::{catalogue_error, map_pool_error};
use super::models::{CarChangeset, CarRow, JoinedCarRow, NewCarRow, car_from_joined};
use super::pool::DbPool;
use super::reference_tables::like_pattern;
use super::schema::{cars, companies, fuel_types};

#[derive(Clone)]
pub struct DieselCarRepository {
    pool: DbPool,
}

impl DieselCarRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Joined car query; callers add filters before loading.
macro_rules! joined_cars {
    () => {
        cars::table
            .inner_join(companies::table)
            .left_join(fuel_types::table)
            .select((
                CarRow::as_select(),
                companies::name,
                fuel_types::name.nullable(),
            ))
            .order_by(cars::id)
    };
}

async fn load_car(
    conn: &mut AsyncPgConnection,
    id: CarId,
) -> Result<Option<Car>, CatalogueRepositoryError> {
    let row: Option<JoinedCarRow> = joined_cars!()
        .filter(cars::id.eq(id.get()))
        .first(conn)
        .await
        .optional()
        .map_err(|err| catalogue_error(err, &format!("car {id}")))?;
    Ok(row.map(car_from_joined))
}

#[async_trait]
impl CarRepository for DieselCarRepository {
    async fn list(&self) -> Result<Vec<Car>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<JoinedCarRow> = joined_cars!()
            .load(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "car"))?;
        Ok(rows.into_iter().map(car_from_joined).collect())
    }

    async fn find(&self, id: CarId) -> Result<Option<Car>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        load_car(&mut conn, id).await
    }

    async fn create(&self, draft: &CarDraft) -> Result<Car, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let id: i32 = diesel::insert_into(cars::table)
            .values(NewCarRow::from(draft))
            .returning(cars::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, &format!("car '{}'", draft.name.as_str())))?;
        let id = CarId::new(id);
        load_car(&mut conn, id)
            .await?
            .ok_or_else(|| CatalogueRepositoryError::query(format!("car {id} vanished after insert")))
    }

    async fn update(
        &self,
        id: CarId,
        patch: &CarPatch,
    ) -> Result<Option<Car>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        if let Some(changeset) = CarChangeset::from_patch(patch) {
            let updated = diesel::update(cars::table.find(id.get()))
                .set(&changeset)
                .execute(&mut conn)
                .await
                .map_err(|err| catalogue_error(err, &format!("car {id}")))?;
            if updated == 0 {
                return Ok(None);
            }
        }
        load_car(&mut conn, id).await
    }

    async fn delete(&self, id: CarId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let deleted = diesel::delete(cars::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, &format!("car {id}")))?;
        Ok(deleted > 0)
    }

    async fn search(&self, query: &str) -> Result<Vec<Car>, CatalogueRepositoryError> {
        let pattern = like_pattern(query);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<JoinedCarRow> = joined_cars!()
            .filter(cars::name.ilike(pattern.as_str()))
            .load(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "car"))?;
        Ok(rows.into_iter().map(car_from_joined).collect())
    }
}
