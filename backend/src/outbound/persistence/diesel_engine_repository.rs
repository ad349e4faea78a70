//! PostgreSQL-backed `EngineRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::catalogue::{Engine, EngineDraft, EngineId, EnginePatch};
use crate::domain::ports::{CatalogueRepositoryError, EngineRepository};

use super::error_mapping::{catalogue_error, map_pool_error};
use super::models::{EngineChangeset, EngineRow, NewEngineRow};
use super::pool::DbPool;
use super::reference_tables::like_pattern;
use super::schema::engines;

#[derive(Clone)]
pub struct DieselEngineRepository {
    pool: DbPool,
}

impl DieselEngineRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngineRepository for DieselEngineRepository {
    async fn list(&self) -> Result<Vec<Engine>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<EngineRow> = engines::table
            .select(EngineRow::as_select())
            .order_by(engines::id)
            .load(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "engine"))?;
        Ok(rows.into_iter().map(Engine::from).collect())
    }

    async fn find(&self, id: EngineId) -> Result<Option<Engine>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<EngineRow> = engines::table
            .find(id.get())
            .select(EngineRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| catalogue_error(err, "engine"))?;
        Ok(row.map(Engine::from))
    }

    async fn create(&self, draft: &EngineDraft) -> Result<Engine, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: EngineRow = diesel::insert_into(engines::table)
            .values(NewEngineRow::from(draft))
            .returning(EngineRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "engine"))?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: EngineId,
        patch: &EnginePatch,
    ) -> Result<Option<Engine>, CatalogueRepositoryError> {
        let Some(changeset) = EngineChangeset::from_patch(patch) else {
            return self.find(id).await;
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<EngineRow> = diesel::update(engines::table.find(id.get()))
            .set(&changeset)
            .returning(EngineRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| catalogue_error(err, &format!("engine {id}")))?;
        Ok(row.map(Engine::from))
    }

    async fn delete(&self, id: EngineId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let deleted = diesel::delete(engines::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, &format!("engine {id}")))?;
        Ok(deleted > 0)
    }

    async fn search(&self, query: &str) -> Result<Vec<Engine>, CatalogueRepositoryError> {
        let pattern = like_pattern(query);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<EngineRow> = engines::table
            .filter(engines::engine_type.ilike(pattern.as_str()))
            .select(EngineRow::as_select())
            .order_by(engines::id)
            .load(&mut conn)
            .await
            .map_err(|err| catalogue_error(err, "engine"))?;
        Ok(rows.into_iter().map(Engine::from).collect())
    }
}
