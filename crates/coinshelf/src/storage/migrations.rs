//! Database schema versioning for coinshelf.
//!
//! Handles the shape of the database itself (registry and metadata tables).
//! This is distinct from the catalog version, which tracks what coins the
//! static catalog knows about; see [`crate::upgrade`]. Migration v1 seeds
//! the catalog version for fresh databases so the upgrade stepper has a
//! starting point.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::series::CURRENT_CATALOG_VERSION;

use super::schema::SCHEMA_STATEMENTS;
use super::CATALOG_VERSION_KEY;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Pending migrations, one entry per schema version, in order.
const MIGRATIONS: &[(i32, fn(&Connection) -> Result<()>)] = &[(1, seed_catalog_version)];

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Creates all fixed tables and indexes if they don't exist, then applies
/// any migrations newer than the stored schema version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails, or if the
/// database was written by a newer build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let from = schema_version(conn)?;
    if from > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {from} is newer than this build supports ({CURRENT_VERSION})"
            ),
        });
    }

    for (version, migration) in MIGRATIONS {
        if *version > from {
            debug!("Applying schema migration v{}", version);
            migration(conn)?;
            set_schema_version(conn, *version)?;
        }
    }

    Ok(())
}

/// The stored schema version, or 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        None => Ok(0),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// v1: record the catalog version for databases that predate the key.
///
/// A fresh database starts at the current catalog version; only databases
/// created under an older catalog have upgrade steps to replay. OR IGNORE
/// keeps an already-recorded (possibly older) catalog version intact.
fn seed_catalog_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value) VALUES (?1, ?2)",
        (CATALOG_VERSION_KEY, CURRENT_CATALOG_VERSION.to_string()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn metadata_value(conn: &Connection, key: &str) -> Option<String> {
        conn.query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .unwrap()
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='collections'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='metadata'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fresh_database_reaches_current_version() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_fresh_database_seeds_catalog_version() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");
        assert_eq!(
            metadata_value(&conn, CATALOG_VERSION_KEY).as_deref(),
            Some(CURRENT_CATALOG_VERSION.to_string().as_str())
        );
    }

    #[test]
    fn test_reinit_keeps_recorded_catalog_version() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("first init failed");

        // simulate a database recorded at an older catalog, pre-v1
        conn.execute(
            "UPDATE metadata SET value = '3' WHERE key = ?1",
            [CATALOG_VERSION_KEY],
        )
        .unwrap();
        conn.execute("DELETE FROM metadata WHERE key = ?1", [VERSION_KEY])
            .unwrap();

        initialize_schema(&conn).expect("second init failed");
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
        assert_eq!(metadata_value(&conn, CATALOG_VERSION_KEY).as_deref(), Some("3"));
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();
        set_schema_version(&conn, CURRENT_VERSION + 1).unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer than this build"));
    }

    #[test]
    fn test_garbage_schema_version_rejected() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = 'banana' WHERE key = ?1",
            [VERSION_KEY],
        )
        .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_migration_versions_are_ordered() {
        let versions: Vec<i32> = MIGRATIONS.iter().map(|(v, _)| *v).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted);
        assert_eq!(versions.last().copied(), Some(CURRENT_VERSION));
    }

    #[test]
    fn test_display_order_index_created() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let indexes: Vec<String> = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='collections'",
            )
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();

        assert!(indexes.iter().any(|n| n.contains("display_order")));
    }
}
