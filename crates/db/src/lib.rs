//! PostgreSQL access layer: pool construction, migrations, store deadlines,
//! models and repositories.

pub mod error;
pub mod models;
pub mod repositories;

use std::future::Future;
use std::io;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::Executor;

pub use error::StoreErrorKind;

pub type DbPool = sqlx::PgPool;

/// Hard upper bound on any single store call.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Create a connection pool from a database URL.
///
/// Every connection carries a server-side `statement_timeout` equal to
/// [`STORE_TIMEOUT`], and acquiring a connection gives up after the same
/// deadline.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(STORE_TIMEOUT)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                let stmt = format!("SET statement_timeout = {}", STORE_TIMEOUT.as_millis());
                conn.execute(stmt.as_str()).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    with_deadline(sqlx::query("SELECT 1").execute(pool)).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Bound a store future by [`STORE_TIMEOUT`].
///
/// An elapsed deadline surfaces as an I/O `TimedOut` error so callers can tell
/// it apart from data errors via [`StoreErrorKind::classify`].
pub async fn with_deadline<T, F>(fut: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = STORE_TIMEOUT.as_millis() as u64, "Store call exceeded deadline");
            Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "store deadline exceeded",
            )))
        }
    }
}
