//! Embedded PostgreSQL databases for adapter tests.
//!
//! Every test gets its own temporary database on the shared cluster, migrated
//! with the same embedded migrations the server runs at startup.

use car_catalogue::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

use super::handle_cluster_setup_failure;

/// A migrated temporary database and a pool connected to it.
pub struct TestDatabase {
    pub pool: DbPool,
    pub url: String,
    _database: TemporaryDatabase,
}

/// Provision a migrated database, or `None` when the cluster is unavailable
/// and `SKIP_TEST_CLUSTER` allows skipping.
pub async fn provision_database() -> Option<TestDatabase> {
    let cluster = match shared_cluster_handle() {
        Ok(cluster) => cluster,
        Err(err) => return handle_cluster_setup_failure(format!("{err:?}")),
    };
    let database = match cluster.create_temporary_database() {
        Ok(database) => database,
        Err(err) => return handle_cluster_setup_failure(format!("{err:?}")),
    };
    let url = database.url().to_owned();
    if let Err(err) = run_migrations(&url).await {
        return handle_cluster_setup_failure(err);
    }
    let pool = match DbPool::new(PoolConfig::new(url.as_str()).with_max_size(2)).await {
        Ok(pool) => pool,
        Err(err) => return handle_cluster_setup_failure(err),
    };
    Some(TestDatabase {
        pool,
        url,
        _database: database,
    })
}
