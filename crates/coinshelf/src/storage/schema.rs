//! `SQLite` schema definitions for coinshelf.
//!
//! Each collection gets its own slot table (created from a template at
//! collection-creation time); this module holds the fixed tables plus the
//! per-collection template.

/// SQL statement to create the collections registry table.
pub const CREATE_COLLECTIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY,
    series TEXT NOT NULL,
    display_order INTEGER NOT NULL,
    created_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `display_order` for listing.
pub const CREATE_DISPLAY_ORDER_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_collections_display_order ON collections(display_order)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All fixed schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_COLLECTIONS_TABLE,
    CREATE_DISPLAY_ORDER_INDEX,
    CREATE_METADATA_TABLE,
];

/// Template for a per-collection slot table. `{table}` is replaced with the
/// quoted collection table name.
///
/// `position` preserves generator order across upgrade appends; slot identity
/// is (identifier, `mint_mark`).
pub const SLOT_TABLE_TEMPLATE: &str = r"
CREATE TABLE {table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL,
    mint_mark TEXT NOT NULL,
    collected INTEGER NOT NULL DEFAULT 0,
    position INTEGER NOT NULL,
    UNIQUE (identifier, mint_mark)
)
";
