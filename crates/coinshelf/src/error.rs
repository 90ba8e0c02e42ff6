//! Error types for coinshelf.
//!
//! This module defines all error types used throughout the coinshelf crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for coinshelf operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// The requested coin series is not in the catalog.
    #[error("unknown coin series: {name}")]
    UnknownSeries {
        /// The series name that was requested.
        name: String,
    },

    /// The requested start/stop years are not valid for the series.
    #[error("invalid date range: {message}")]
    InvalidDateRange {
        /// Description of the validation failure.
        message: String,
    },

    /// Mint marks were requested but none were enabled.
    #[error("at least one mint mark must be selected")]
    NoMintMarkSelected,

    /// The series does not allow editing its date range.
    #[error("series '{series}' does not support a custom date range")]
    DateRangeNotEditable {
        /// The series name.
        series: String,
    },

    // === Collection Errors ===
    /// A collection with this name already exists.
    #[error("a collection named '{name}' already exists")]
    CollectionExists {
        /// The duplicate name.
        name: String,
    },

    /// No collection with this name exists.
    #[error("no collection named '{name}'")]
    CollectionNotFound {
        /// The missing name.
        name: String,
    },

    /// The collection name contains characters we can't store.
    #[error("invalid collection name '{name}': {message}")]
    InvalidCollectionName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// No slot matches the given identifier and mint mark.
    #[error("no slot '{slot}' in collection '{collection}'")]
    SlotNotFound {
        /// The collection that was searched.
        collection: String,
        /// Human-readable slot description (identifier + mint mark).
        slot: String,
    },

    // === Worker Errors ===
    /// The storage worker has shut down.
    #[error("storage worker is not running")]
    WorkerGone,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for coinshelf operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an unknown-series error.
    #[must_use]
    pub fn unknown_series(name: impl Into<String>) -> Self {
        Self::UnknownSeries { name: name.into() }
    }

    /// Create an invalid-date-range error.
    #[must_use]
    pub fn invalid_date_range(message: impl Into<String>) -> Self {
        Self::InvalidDateRange {
            message: message.into(),
        }
    }

    /// Create an invalid-collection-name error.
    #[must_use]
    pub fn invalid_collection_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCollectionName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a user-input validation failure (as opposed to
    /// a storage or internal fault). The CLI exits with a distinct status
    /// for these.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownSeries { .. }
                | Self::InvalidDateRange { .. }
                | Self::NoMintMarkSelected
                | Self::DateRangeNotEditable { .. }
                | Self::CollectionExists { .. }
                | Self::InvalidCollectionName { .. }
        )
    }
}
