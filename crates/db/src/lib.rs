//! PostgreSQL persistence for generated READMEs and quota bookkeeping.
//!
//! Repositories are zero-sized structs providing async methods that accept
//! `&PgPool` as the first argument. The [`store`] module wraps them behind
//! async traits so the service layer can run against in-memory
//! implementations ([`memory`]) in tests.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use store::{
    allocate_unique_short_id, PgQuotaStore, PgReadmeStore, QuotaStore, ReadmeStore,
};

/// Create a connection pool and verify connectivity.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Create a pool that connects on first use instead of eagerly.
///
/// The short acquire timeout keeps health probes fast when the database is
/// unreachable.
pub fn create_lazy_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy(database_url)
}

/// Cheap liveness probe used by the health endpoint and at startup.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
