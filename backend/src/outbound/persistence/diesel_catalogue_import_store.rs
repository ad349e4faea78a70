//! PostgreSQL-backed import store.
//!
//! One pooled connection is held for the whole run. Diesel's
//! `AnsiTransactionManager` turns nested `begin_transaction` calls into
//! `SAVEPOINT`s, which gives each row its own rollback scope.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::warn;

use crate::domain::catalogue::{
    CarDraft, CarId, EngineDraft, EngineId, NamedReference, PerformanceDraft, PerformanceId,
    ReferenceId, ReferenceKind, ReferenceName,
};
use crate::domain::ports::{CatalogueImportStore, ImportStoreError, ImportTransaction};

use super::error_mapping::{import_error, map_pool_error};
use super::models::{NewCarRow, NewEngineRow, NewPerformanceRow};
use super::pool::DbPool;
use super::reference_tables::with_reference_table;
use super::schema::{cars, engines, performance};

#[derive(Clone)]
pub struct DieselCatalogueImportStore {
    pool: DbPool,
}

impl DieselCatalogueImportStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogueImportStore for DieselCatalogueImportStore {
    async fn begin(&self) -> Result<Box<dyn ImportTransaction>, ImportStoreError> {
        let mut conn = self
            .pool
            .get_owned()
            .await
            .map_err(|err| map_pool_error(err, ImportStoreError::connection))?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(import_error)?;
        Ok(Box::new(DieselImportTransaction {
            conn,
            finished: false,
        }))
    }
}

struct DieselImportTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
    finished: bool,
}

impl DieselImportTransaction {
    async fn finish(mut self: Box<Self>, commit: bool) -> Result<(), ImportStoreError> {
        self.finished = true;
        let outcome = if commit {
            AnsiTransactionManager::commit_transaction(&mut *self.conn).await
        } else {
            AnsiTransactionManager::rollback_transaction(&mut *self.conn).await
        };
        outcome.map_err(import_error)
    }
}

impl Drop for DieselImportTransaction {
    fn drop(&mut self) {
        if !self.finished {
            // bb8 treats a connection with an open transaction as broken and
            // discards it, so the uncommitted writes die with the connection.
            warn!("import transaction dropped without commit or rollback");
        }
    }
}

#[async_trait]
impl ImportTransaction for DieselImportTransaction {
    async fn savepoint(&mut self) -> Result<(), ImportStoreError> {
        AnsiTransactionManager::begin_transaction(&mut *self.conn)
            .await
            .map_err(import_error)
    }

    async fn release_savepoint(&mut self) -> Result<(), ImportStoreError> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(import_error)
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), ImportStoreError> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(import_error)
    }

    async fn find_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, ImportStoreError> {
        let conn: &mut AsyncPgConnection = &mut self.conn;
        let row: Option<(i32, String)> = with_reference_table!(kind, table => {
            table::table
                .filter(table::name.eq(name.as_str()))
                .select((table::id, table::name))
                .first(conn)
                .await
                .optional()
        })
        .map_err(import_error)?;
        Ok(row.map(|(id, name)| NamedReference {
            id: ReferenceId::new(id),
            name,
        }))
    }

    async fn insert_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, ImportStoreError> {
        let conn: &mut AsyncPgConnection = &mut self.conn;
        let (id, name): (i32, String) = with_reference_table!(kind, table => {
            diesel::insert_into(table::table)
                .values(table::name.eq(name.as_str()))
                .returning((table::id, table::name))
                .get_result(conn)
                .await
        })
        .map_err(import_error)?;
        Ok(NamedReference {
            id: ReferenceId::new(id),
            name,
        })
    }

    async fn insert_engine(&mut self, draft: &EngineDraft) -> Result<EngineId, ImportStoreError> {
        let id: i32 = diesel::insert_into(engines::table)
            .values(NewEngineRow::from(draft))
            .returning(engines::id)
            .get_result(&mut *self.conn)
            .await
            .map_err(import_error)?;
        Ok(EngineId::new(id))
    }

    async fn insert_car(&mut self, draft: &CarDraft) -> Result<CarId, ImportStoreError> {
        let id: i32 = diesel::insert_into(cars::table)
            .values(NewCarRow::from(draft))
            .returning(cars::id)
            .get_result(&mut *self.conn)
            .await
            .map_err(import_error)?;
        Ok(CarId::new(id))
    }

    async fn insert_performance(
        &mut self,
        draft: &PerformanceDraft,
    ) -> Result<PerformanceId, ImportStoreError> {
        let id: i32 = diesel::insert_into(performance::table)
            .values(NewPerformanceRow::from(draft))
            .returning(performance::id)
            .get_result(&mut *self.conn)
            .await
            .map_err(import_error)?;
        Ok(PerformanceId::new(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), ImportStoreError> {
        self.finish(true).await
    }

    async fn rollback(self: Box<Self>) -> Result<(), ImportStoreError> {
        self.finish(false).await
    }
}
