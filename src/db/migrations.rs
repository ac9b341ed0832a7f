// src/db/migrations.rs
//
// Schema initialization. One embedded schema file, one recorded
// version, no automatic upgrades: a database from a different version
// is an error, not a guess.

use rusqlite::Connection;

use crate::error::{AppError, AppResult};

/// Version written by the current schema.sql.
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Bring a fresh connection's database up to the current schema.
/// Already-initialized databases pass through untouched; databases
/// stamped with any other version are rejected.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    match schema_version(conn)? {
        0 => {
            conn.execute_batch(include_str!("../../schema.sql"))
                .map_err(|e| AppError::Other(format!("Failed to apply schema: {}", e)))?;
            stamp_version(conn, CURRENT_SCHEMA_VERSION)
        }
        v if v == CURRENT_SCHEMA_VERSION => Ok(()),
        v => Err(AppError::Other(format!(
            "Database schema version {} is not supported (expected {})",
            v, CURRENT_SCHEMA_VERSION
        ))),
    }
}

/// Recorded schema version; 0 when the database has never been
/// initialized (no schema_version table yet).
fn schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM sqlite_master
             WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;

    Ok(version.unwrap_or(0))
}

fn stamp_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at)
         VALUES (?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn fresh_database_initializes_to_current_version() {
        let conn = create_test_connection().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        initialize_database(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('characters', 'locations', 'forms', 'schema_version')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 4);
    }

    #[test]
    fn initialization_is_idempotent() {
        let conn = create_test_connection().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (99, datetime('now'))",
            [],
        )
        .unwrap();

        assert!(initialize_database(&conn).is_err());
    }

    #[test]
    fn child_link_to_missing_character_is_rejected() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        // Links must point at stored characters; unknown owners are
        // stored as NULL instead, never as dangling ids.
        let result = conn.execute(
            "INSERT INTO locations (id, date, latitude, longitude, character_id)
             VALUES ('loc-1', '2024-01-01', '0', '0', 'nonexistent-character')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn unlinked_child_rows_are_allowed() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        conn.execute(
            "INSERT INTO locations (id, date, latitude, longitude, character_id)
             VALUES ('loc-1', '2024-01-01', '0', '0', NULL)",
            [],
        )
        .unwrap();
    }
}
