//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for the SQLite-backed history store.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::StoreError;

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for one pooled connection drawn from a [`DbPool`].
pub type PooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Create a connection pool for the given database URL with up to
/// `pool_size` connections.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str, pool_size: u32) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|e| StoreError::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = pool
        .get()
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(())
}

/// Configure SQLite connection pragmas used for history writes.
///
/// Sets `busy_timeout` so a writer blocks and retries on `SQLITE_BUSY`
/// instead of failing immediately when another pooled connection holds
/// the write lock.
///
/// # Errors
/// Returns an error if a pragma fails to apply.
pub fn configure_sqlite_connection(
    conn: &mut SqliteConnection,
    busy_timeout_ms: u64,
) -> Result<(), StoreError> {
    diesel::sql_query(format!("PRAGMA busy_timeout={busy_timeout_ms}"))
        .execute(conn)
        .map_err(|e| StoreError::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:", 5);
        assert!(pool.is_ok());
    }

    #[test]
    fn create_pool_can_get_connection() {
        let pool = create_pool(":memory:", 5).unwrap();
        assert!(pool.get().is_ok());
    }

    #[test]
    fn run_migrations_creates_tables() {
        let pool = create_pool(":memory:", 5).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let result: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        assert!(result.contains(&"auction_outcomes".to_string()));
        assert!(result.contains(&"auction_rounds".to_string()));
        assert!(result.contains(&"strategy_performance".to_string()));
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(":memory:", 5).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        assert!(pool.get().is_ok());
    }

    #[test]
    fn configure_sqlite_connection_sets_pragmas() {
        let pool = create_pool(":memory:", 5).unwrap();
        run_migrations(&pool).unwrap();
        let mut conn = pool.get().unwrap();
        assert!(configure_sqlite_connection(&mut conn, 5_000).is_ok());
    }
}
