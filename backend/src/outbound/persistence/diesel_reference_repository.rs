//! PostgreSQL-backed `ReferenceRepository` for companies and fuel types.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::catalogue::{NamedReference, ReferenceId, ReferenceKind, ReferenceName};
use crate::domain::ports::{CatalogueRepositoryError, ReferenceRepository};

use super::error_mapping::{catalogue_error, map_pool_error};
use super::pool::DbPool;
use super::reference_tables::{like_pattern, with_reference_table};

/// Diesel adapter over the `companies` and `fuel_types` tables.
#[derive(Clone)]
pub struct DieselReferenceRepository {
    pool: DbPool,
}

impl DieselReferenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain((id, name): (i32, String)) -> NamedReference {
    NamedReference {
        id: ReferenceId::new(id),
        name,
    }
}

#[async_trait]
impl ReferenceRepository for DieselReferenceRepository {
    async fn list(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<(i32, String)> = with_reference_table!(kind, table => {
            table::table
                .select((table::id, table::name))
                .order_by(table::id)
                .load(&mut conn)
                .await
        })
        .map_err(|err| catalogue_error(err, kind.label()))?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<(i32, String)> = with_reference_table!(kind, table => {
            table::table
                .find(id.get())
                .select((table::id, table::name))
                .first(&mut conn)
                .await
                .optional()
        })
        .map_err(|err| catalogue_error(err, kind.label()))?;
        Ok(row.map(to_domain))
    }

    async fn create(
        &self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: (i32, String) = with_reference_table!(kind, table => {
            diesel::insert_into(table::table)
                .values(table::name.eq(name.as_str()))
                .returning((table::id, table::name))
                .get_result(&mut conn)
                .await
        })
        .map_err(|err| catalogue_error(err, &format!("{kind} '{name}'")))?;
        Ok(to_domain(row))
    }

    async fn rename(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let row: Option<(i32, String)> = with_reference_table!(kind, table => {
            diesel::update(table::table.find(id.get()))
                .set(table::name.eq(name.as_str()))
                .returning((table::id, table::name))
                .get_result(&mut conn)
                .await
                .optional()
        })
        .map_err(|err| catalogue_error(err, &format!("{kind} '{name}'")))?;
        Ok(row.map(to_domain))
    }

    async fn delete(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let deleted: usize = with_reference_table!(kind, table => {
            diesel::delete(table::table.find(id.get()))
                .execute(&mut conn)
                .await
        })
        .map_err(|err| catalogue_error(err, &format!("{kind} {id}")))?;
        Ok(deleted > 0)
    }

    async fn search(
        &self,
        kind: ReferenceKind,
        query: &str,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError> {
        let pattern = like_pattern(query);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogueRepositoryError::connection))?;
        let rows: Vec<(i32, String)> = with_reference_table!(kind, table => {
            table::table
                .filter(table::name.ilike(pattern.as_str()))
                .select((table::id, table::name))
                .order_by(table::id)
                .load(&mut conn)
                .await
        })
        .map_err(|err| catalogue_error(err, kind.label()))?;
        Ok(rows.into_iter().map(to_domain).collect())
    }
}
