//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use gallery_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use uuid::Uuid;

use crate::migrations;

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Set up connection pooling with r2d2
/// - Enable foreign key constraints on all connections
/// - Run pending database migrations
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file
/// * `max_size` - Maximum number of pooled connections
///
/// `":memory:"` and `mode=memory` URIs open a shared-cache memory database,
/// so every pooled connection sees the migrated schema.
///
/// # Example
///
/// ```no_run
/// use gallery_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/gallery/gallery.db", 4).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    if max_size == 0 {
        return Err(Error::validation("pool size must be at least 1"));
    }

    if db_path == ":memory:" {
        tracing::info!("Opening in-memory gallery database");
        return build_pool(SqliteConnectionManager::file(memory_uri()), max_size);
    }

    if db_path.contains("mode=memory") && !db_path.contains("cache=shared") {
        let separator = if db_path.contains('?') { '&' } else { '?' };
        let uri = format!("{}{}cache=shared", db_path, separator);
        tracing::info!("Opening in-memory gallery database at {}", uri);
        return build_pool(SqliteConnectionManager::file(uri), max_size);
    }

    tracing::info!("Opening gallery database at {}", db_path);
    build_pool(SqliteConnectionManager::file(db_path), max_size)
}

/// Initialize an in-memory database pool for testing.
///
/// Every connection in the pool shares one private in-memory database, named
/// after a fresh UUID so that separate pools never see each other's rows.
/// The database is lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use gallery_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    build_pool(SqliteConnectionManager::file(memory_uri()), DEFAULT_POOL_SIZE)
}

/// A fresh shared-cache memory database name.
fn memory_uri() -> String {
    format!("file:gallery-{}?mode=memory&cache=shared", Uuid::new_v4())
}

fn build_pool(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let manager = manager.with_init(|conn| {
        // Enable foreign key constraints on each new connection
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    });

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
///
/// # Example
///
/// ```
/// use gallery_db::pool::{init_memory_pool, get_conn};
///
/// let pool = init_memory_pool().unwrap();
/// let conn = get_conn(&pool).unwrap();
/// ```
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}
