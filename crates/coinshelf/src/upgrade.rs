//! Catalog upgrade stepper.
//!
//! When the static catalog learns about new production years, databases
//! created under an older catalog are missing those slots. This module walks
//! the version thresholds between the stored catalog version and
//! [`CURRENT_CATALOG_VERSION`], appending each newly introduced year to every
//! collection of the affected series.
//!
//! The stepper is monotonic and idempotent: a database at the current version
//! is a no-op, and appended years are guarded both by the recorded version
//! and by a presence check on the year itself.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::generator;
use crate::series::{self, CoinSeries, CURRENT_CATALOG_VERSION};
use crate::storage::Storage;

/// What an upgrade run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeReport {
    /// Catalog version the database was at.
    pub from_version: i32,
    /// Catalog version the database is now at.
    pub to_version: i32,
    /// Total slot rows appended.
    pub rows_added: usize,
    /// Number of collections that gained at least one slot.
    pub collections_updated: usize,
}

impl UpgradeReport {
    /// Whether the run changed anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.rows_added == 0 && self.from_version == self.to_version
    }
}

/// Bring a database up to the current catalog version.
///
/// # Errors
///
/// Returns an error if a database operation fails; validation problems with
/// individual collections (e.g. a series no longer in the catalog) are
/// logged and skipped.
pub fn run_catalog_upgrade(storage: &mut Storage) -> Result<UpgradeReport> {
    let from_version = storage.catalog_version()?;
    let to_version = CURRENT_CATALOG_VERSION;

    if from_version >= to_version {
        debug!("Catalog already at version {}", from_version);
        return Ok(UpgradeReport {
            from_version,
            to_version: from_version,
            rows_added: 0,
            collections_updated: 0,
        });
    }

    info!(
        "Upgrading catalog from version {} to {}",
        from_version, to_version
    );

    let mut rows_added = 0;
    let mut collections_updated = 0;

    for summary in storage.list_collections()? {
        let Some(series) = series::find(&summary.series) else {
            warn!(
                "Collection '{}' references unknown series '{}', skipping",
                summary.name, summary.series
            );
            continue;
        };

        let added = upgrade_collection(storage, &summary.name, series, from_version)?;
        if added > 0 {
            collections_updated += 1;
            rows_added += added;
        }
    }

    storage.set_catalog_version(to_version)?;
    info!(
        "Catalog upgrade added {} slots across {} collections",
        rows_added, collections_updated
    );

    Ok(UpgradeReport {
        from_version,
        to_version,
        rows_added,
        collections_updated,
    })
}

/// Append the years a single collection is missing. Returns rows added.
fn upgrade_collection(
    storage: &mut Storage,
    name: &str,
    series: &'static dyn CoinSeries,
    from_version: i32,
) -> Result<usize> {
    let mut added = 0;

    for step in series.upgrade_steps() {
        if step.version <= from_version || step.version > CURRENT_CATALOG_VERSION {
            continue;
        }
        if storage.has_year(name, step.year)? {
            continue;
        }
        // A collection that stops short of the previous production year was
        // deliberately limited by the user; leave it alone.
        let Some(previous) = step.year.checked_sub(1) else {
            continue;
        };
        if !storage.has_year(name, previous)? {
            debug!(
                "Collection '{}' doesn't reach {}, not appending {}",
                name, previous, step.year
            );
            continue;
        }

        let marks = storage.marks_for_year(name, previous)?;
        let slots = generator::generate_year(step.year, &marks);
        added += storage.append_slots(name, &slots)?;
        debug!(
            "Appended {} slot(s) for {} to '{}'",
            slots.len(),
            step.year,
            name
        );
    }

    Ok(added)
}
