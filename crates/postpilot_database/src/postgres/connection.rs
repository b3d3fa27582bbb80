//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use postpilot_error::{StoreError, StoreErrorKind, StoreResult};
use tracing::instrument;

/// Pooled PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Create a connection pool for `database_url`.
///
/// # Errors
///
/// Returns an error if the pool cannot be created.
#[instrument(name = "database.create_pool", skip(database_url))]
pub fn create_pool(database_url: &str, max_size: u32) -> StoreResult<PgPool> {
    tracing::debug!(max_size, "Creating PostgreSQL connection pool");
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder().max_size(max_size).build(manager).map_err(|e| {
        tracing::error!(error = %e, "Failed to create connection pool");
        StoreError::new(StoreErrorKind::Connection(e.to_string()))
    })
}

/// Apply pending schema migrations.
#[instrument(name = "database.run_migrations", skip(pool))]
pub fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::new(StoreErrorKind::Migration(e.to_string())))?;
    tracing::info!(count = applied.len(), "Migrations applied");
    Ok(())
}

/// Run a blocking Diesel operation on a pooled connection off the async runtime.
pub(crate) async fn with_connection<T, F>(pool: &PgPool, op: F) -> StoreResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        op(&mut conn)
    })
    .await
    .map_err(|e| StoreError::new(StoreErrorKind::Connection(format!("blocking task failed: {e}"))))?
}
