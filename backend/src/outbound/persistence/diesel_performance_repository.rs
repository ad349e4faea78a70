//! PostgreSQL-backed `PerformanceRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::catalogue::{
    Performance, PerformanceDraft, PerformanceId, PerformancePatch, PerformanceSearch,
};
use crate::domain::ports::{CatalogueRepositoryError, PerformanceRepository};

use super::error_mapping::{catalogue_error, map_pool_error};
use super::models::{NewPerformanceRow, PerformanceChangeset, PerformanceRow};
use super::pool::DbPool;
use super::schema::performance;

#[derive(Clone)]
pub struct DieselPerformanceRepository {
    pool: DbPool,
}

impl DieselPerformanceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Threshold usable against an `INTEGER` column, or `None` when no stored
/// value can reach it.
fn column_threshold(min: i64) -> Option<i32> {
    match i32::try_from(min) {
        Ok(value) => Some(value),
        Err(_) if min < 0 => Some(i32::MIN),
        Err(_) => None,
    }
}

#[async_trait]
impl PerformanceRepository for DieselPerformanceRepository {
    async fn list(&self) -> Result<Vec<Performance>, CatalogueRepositoryError> {
        self.search(PerformanceSearch::All).await
    }

    async fn find(
        &self,
        id: PerformanceId,
    ) -> Result<Option<Performance>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<PerformanceRow> = performance::table
            .find(id.get())
            .select(PerformanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| catalogue_error(err, "performance record"))?;
        Ok(row.map(Performance::from))
    }

    async fn create(
        &self,
        draft: &PerformanceDraft,
    ) -> Result<Performance, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: PerformanceRow = diesel::insert_into(performance::table)
            .values(NewPerformanceRow::from(draft))
            .returning(PerformanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "performance record"))?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: PerformanceId,
        patch: &PerformancePatch,
    ) -> Result<Option<Performance>, CatalogueRepositoryError> {
        let Some(changeset) = PerformanceChangeset::from_patch(patch) else {
            return self.find(id).await;
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<PerformanceRow> = diesel::update(performance::table.find(id.get()))
            .set(&changeset)
            .returning(PerformanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| catalogue_error(err, &format!("performance record {id}")))?;
        Ok(row.map(Performance::from))
    }

    async fn delete(&self, id: PerformanceId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let deleted = diesel::delete(performance::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, &format!("performance record {id}")))?;
        Ok(deleted > 0)
    }

    async fn search(
        &self,
        filter: PerformanceSearch,
    ) -> Result<Vec<Performance>, CatalogueRepositoryError> {
        let mut query = performance::table
            .select(PerformanceRow::as_select())
            .order_by(performance::id)
            .into_boxed();
        if let PerformanceSearch::MinTopSpeed(min) = filter {
            let Some(threshold) = column_threshold(min) else {
                return Ok(Vec::new());
            };
            query = query.filter(performance::top_speed.ge(threshold));
        }

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<PerformanceRow> = query
            .load(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "performance record"))?;
        Ok(rows.into_iter().map(Performance::from).collect())
    }
}
