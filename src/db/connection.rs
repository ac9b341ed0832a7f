// src/db/connection.rs
//
// Pooled SQLite access. Connections are created here and nowhere
// else; every pooled connection comes up with the same pragmas.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub type ConnectionPool = Pool<SqliteConnectionManager>;
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Where a store keeps its rows.
#[derive(Debug, Clone)]
pub enum StoreMode {
    /// Durable database file at the given path.
    OnDisk(PathBuf),

    /// Private in-memory database; its contents vanish when the pool
    /// is dropped.
    InMemory,
}

/// Default on-disk database location.
///
/// Path structure: {APP_DATA}/herodex/herodex.db
pub fn default_database_path() -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    Ok(data_dir.join("herodex").join("herodex.db"))
}

/// Create a connection pool for the given mode. Up to 15 connections,
/// WAL journaling (a no-op for in-memory databases), foreign keys on,
/// and a busy timeout so concurrent writers queue instead of erroring.
pub fn create_connection_pool(mode: &StoreMode) -> AppResult<ConnectionPool> {
    let manager = match mode {
        StoreMode::OnDisk(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectionManager::file(path)
        }
        StoreMode::InMemory => {
            // Plain :memory: would give every pooled connection its own
            // private database. A uniquely named shared-cache URI makes
            // all connections of this pool open the same database while
            // keeping separate pools isolated from each other.
            let name = format!("file:herodex-{}?mode=memory&cache=shared", Uuid::new_v4());
            SqliteConnectionManager::file(name)
        }
    };

    let manager = manager.with_init(|conn| {
        // foreign_keys is off by default in SQLite and is per-connection
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder().max_size(15).build(manager)?;

    Ok(pool)
}

/// Fetch a pooled connection with a message that names the operation.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Standalone in-memory connection for unit tests, with the same
/// foreign-key pragma as pooled ones.
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}
