//! Storage layer for coinshelf.
//!
//! This module provides `SQLite`-based persistent storage for collections.
//! Each collection owns its own slot table; a `collections` registry table
//! tracks them, and a `metadata` table holds the schema and catalog versions.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::coin::CoinSlot;
use crate::error::{Error, Result};

/// Metadata key under which the catalog version is stored.
const CATALOG_VERSION_KEY: &str = "catalog_version";

/// Longest collection name we accept.
const MAX_NAME_LEN: usize = 100;

/// Storage engine for coin collections.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Collection creation (one slot table per collection)
/// - Slot listing and collected-flag updates
/// - Collection deletion and listing with progress counts
/// - Catalog-version bookkeeping for the upgrade stepper
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps list/show reads cheap while the worker writes
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a new collection with the given slot list.
    ///
    /// Registers the collection, creates its slot table, and inserts the
    /// slots in generator order. Returns the number of slots inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCollectionName`] for names we can't store,
    /// [`Error::CollectionExists`] for duplicates, or a database error.
    pub fn create_collection(
        &mut self,
        name: &str,
        series: &str,
        slots: &[CoinSlot],
    ) -> Result<usize> {
        validate_collection_name(name)?;
        if self.collection_exists(name)? {
            return Err(Error::CollectionExists {
                name: name.to_string(),
            });
        }

        let display_order = self.next_display_order()?;
        let created_at = Utc::now().to_rfc3339();
        let table = quoted_table(name);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO collections (name, series, display_order, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, series, display_order, created_at],
        )?;
        tx.execute(&schema::SLOT_TABLE_TEMPLATE.replace("{table}", &table), [])?;
        {
            let sql = format!(
                "INSERT INTO {table} (identifier, mint_mark, collected, position) VALUES (?1, ?2, ?3, ?4)"
            );
            let mut stmt = tx.prepare(&sql)?;
            for (position, slot) in slots.iter().enumerate() {
                stmt.execute(params![
                    slot.identifier,
                    slot.mint_mark,
                    i32::from(slot.collected),
                    i64::try_from(position).unwrap_or(i64::MAX),
                ])?;
            }
        }
        tx.commit()?;

        debug!("Created collection '{}' with {} slots", name, slots.len());
        Ok(slots.len())
    }

    /// Check if a collection with the given name already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn collection_exists(&self, name: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM collections WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all collections in display order, with progress counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, series, display_order, created_at FROM collections ORDER BY display_order",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (name, series, display_order, created_at) in rows {
            let table = quoted_table(&name);
            let (total, collected): (i64, i64) = self.conn.query_row(
                &format!("SELECT COUNT(*), COALESCE(SUM(collected), 0) FROM {table}"),
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let created_at = match DateTime::parse_from_rfc3339(&created_at) {
                Ok(dt) => dt.with_timezone(&Utc),
                Err(err) => {
                    warn!(
                        "Collection '{}' has unparseable created_at '{}': {}",
                        name, created_at, err
                    );
                    Utc::now()
                }
            };
            summaries.push(CollectionSummary {
                name,
                series,
                display_order,
                created_at,
                total_slots: total,
                collected_slots: collected,
            });
        }
        Ok(summaries)
    }

    /// Get a single collection's summary, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_collection(&self, name: &str) -> Result<Option<CollectionSummary>> {
        Ok(self
            .list_collections()?
            .into_iter()
            .find(|summary| summary.name == name))
    }

    /// Fetch a collection's slots in display order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection doesn't exist.
    pub fn slots(&self, name: &str) -> Result<Vec<CoinSlot>> {
        self.require_collection(name)?;
        let table = quoted_table(name);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, identifier, mint_mark, collected FROM {table} ORDER BY position"
        ))?;
        let slots = stmt
            .query_map([], row_to_slot)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(slots)
    }

    /// Set a slot's collected flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] for an unknown collection or
    /// [`Error::SlotNotFound`] when no slot matches.
    pub fn set_collected(
        &self,
        name: &str,
        identifier: &str,
        mint_mark: &str,
        collected: bool,
    ) -> Result<()> {
        self.require_collection(name)?;
        let table = quoted_table(name);
        let affected = self.conn.execute(
            &format!("UPDATE {table} SET collected = ?1 WHERE identifier = ?2 AND mint_mark = ?3"),
            params![i32::from(collected), identifier, mint_mark],
        )?;
        if affected == 0 {
            let slot = if mint_mark.is_empty() {
                identifier.to_string()
            } else {
                format!("{identifier} {mint_mark}")
            };
            return Err(Error::SlotNotFound {
                collection: name.to_string(),
                slot,
            });
        }
        Ok(())
    }

    /// Delete a collection and its slot table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection doesn't exist.
    pub fn delete_collection(&mut self, name: &str) -> Result<()> {
        self.require_collection(name)?;
        let table = quoted_table(name);
        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
        tx.execute("DELETE FROM collections WHERE name = ?1", [name])?;
        tx.commit()?;
        info!("Deleted collection '{}'", name);
        Ok(())
    }

    /// Check whether a collection contains a slot for the given year.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection doesn't exist.
    pub fn has_year(&self, name: &str, year: u16) -> Result<bool> {
        self.require_collection(name)?;
        let table = quoted_table(name);
        let count: i32 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE identifier = ?1"),
            [year.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// The mint marks present for a given year, in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection doesn't exist.
    pub fn marks_for_year(&self, name: &str, year: u16) -> Result<Vec<String>> {
        self.require_collection(name)?;
        let table = quoted_table(name);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT mint_mark FROM {table} WHERE identifier = ?1 ORDER BY position"
        ))?;
        let marks = stmt
            .query_map([year.to_string()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(marks)
    }

    /// Append slots to an existing collection, after all current positions.
    ///
    /// Used by the catalog upgrade stepper. Returns the number of rows added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection doesn't exist.
    pub fn append_slots(&mut self, name: &str, slots: &[CoinSlot]) -> Result<usize> {
        self.require_collection(name)?;
        let table = quoted_table(name);

        let tx = self.conn.transaction()?;
        let next_position: i64 = tx.query_row(
            &format!("SELECT COALESCE(MAX(position), -1) + 1 FROM {table}"),
            [],
            |row| row.get(0),
        )?;
        let mut added = 0;
        {
            let sql = format!(
                "INSERT OR IGNORE INTO {table} (identifier, mint_mark, collected, position) VALUES (?1, ?2, 0, ?3)"
            );
            let mut stmt = tx.prepare(&sql)?;
            for (offset, slot) in slots.iter().enumerate() {
                // OR IGNORE drops duplicates, so execute reports 0 for them
                added += stmt.execute(params![
                    slot.identifier,
                    slot.mint_mark,
                    next_position + i64::try_from(offset).unwrap_or(i64::MAX),
                ])?;
            }
        }
        tx.commit()?;
        Ok(added)
    }

    /// The catalog version this database was last upgraded to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn catalog_version(&self) -> Result<i32> {
        catalog_version(&self.conn)
    }

    /// Record the catalog version after an upgrade run.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_catalog_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (CATALOG_VERSION_KEY, version.to_string()),
        )?;
        Ok(())
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let summaries = self.list_collections()?;
        let total_collections = i64::try_from(summaries.len()).unwrap_or(i64::MAX);
        let total_slots = summaries.iter().map(|s| s.total_slots).sum();
        let collected_slots = summaries.iter().map(|s| s.collected_slots).sum();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_collections,
            total_slots,
            collected_slots,
            catalog_version: self.catalog_version()?,
            db_size_bytes,
        })
    }

    fn next_display_order(&self) -> Result<i64> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(display_order), 0) + 1 FROM collections",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    fn require_collection(&self, name: &str) -> Result<()> {
        if self.collection_exists(name)? {
            Ok(())
        } else {
            Err(Error::CollectionNotFound {
                name: name.to_string(),
            })
        }
    }
}

fn catalog_version(conn: &Connection) -> Result<i32> {
    let result: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [CATALOG_VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;
    match result {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid catalog version: {value}"),
        }),
        None => Ok(0),
    }
}

/// Validate a collection name.
///
/// Square brackets and quote characters break quoted table names, so they
/// are rejected up front; so are control characters and over-long names.
///
/// # Errors
///
/// Returns [`Error::InvalidCollectionName`] describing the problem.
pub fn validate_collection_name(name: &str) -> Result<()> {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    let forbidden =
        FORBIDDEN.get_or_init(|| Regex::new(r#"[\[\]"`]"#).expect("pattern is valid"));

    if name.trim().is_empty() {
        return Err(Error::invalid_collection_name(name, "name is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::invalid_collection_name(
            name,
            format!("name is longer than {MAX_NAME_LEN} bytes"),
        ));
    }
    if forbidden.is_match(name) {
        return Err(Error::invalid_collection_name(
            name,
            "brackets and quote characters are not allowed",
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(Error::invalid_collection_name(
            name,
            "control characters are not allowed",
        ));
    }
    Ok(())
}

/// Quote a collection's slot table name as a SQL identifier.
fn quoted_table(name: &str) -> String {
    // validate_collection_name rejects embedded double quotes
    format!("\"coins_{name}\"")
}

/// Convert a database row to a `CoinSlot`.
fn row_to_slot(row: &rusqlite::Row) -> rusqlite::Result<CoinSlot> {
    let id: i64 = row.get(0)?;
    let identifier: String = row.get(1)?;
    let mint_mark: String = row.get(2)?;
    let collected: i32 = row.get(3)?;
    Ok(CoinSlot {
        id: Some(id),
        identifier,
        mint_mark,
        collected: collected != 0,
    })
}

/// A collection with its progress counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// User-chosen collection name.
    pub name: String,
    /// Display name of the series it was created from.
    pub series: String,
    /// Position in the user's list.
    pub display_order: i64,
    /// When the collection was created.
    pub created_at: DateTime<Utc>,
    /// Number of slots.
    pub total_slots: i64,
    /// Number of collected slots.
    pub collected_slots: i64,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of collections.
    pub total_collections: i64,
    /// Total slots across all collections.
    pub total_slots: i64,
    /// Collected slots across all collections.
    pub collected_slots: i64,
    /// Catalog version the database is at.
    pub catalog_version: i32,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
