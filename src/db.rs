//! Connection pool construction and embedded migrations.

use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared pool of PostgreSQL connections.
pub type DbPool = Pool<ConnectionManager<PgConnection>>;
/// A connection checked out of [`DbPool`]; returned to the pool on drop.
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Boxed error type returned by the migration harness.
pub type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build a pool for `database_url`.
///
/// `connection_timeout` bounds how long [`Pool::get`] waits for a free
/// connection before failing.
pub fn establish_connection_pool(
    database_url: &str,
    max_size: u32,
    connection_timeout: Duration,
) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .test_on_check_out(true)
        .build(manager)
}

/// Apply every migration that has not been run yet.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<usize, MigrationError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in &applied {
        log::info!("Applied migration {version}");
    }
    Ok(applied.len())
}

/// Revert every applied migration, dropping all inventory tables and data.
pub fn revert_all_migrations(conn: &mut PgConnection) -> Result<usize, MigrationError> {
    let reverted = conn.revert_all_migrations(MIGRATIONS)?;
    for version in &reverted {
        log::warn!("Reverted migration {version}");
    }
    Ok(reverted.len())
}
