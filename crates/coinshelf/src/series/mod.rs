//! The static catalog of known coin series.
//!
//! Each series ships a [`CoinSeries`] implementation: display name, valid
//! year range, default creation parameters, and the catalog versions at which
//! new production years were introduced. The registry in this module is the
//! single source of truth for what can be collected.

mod american_innovation_dollars;
mod native_american_dollars;
mod presidential_dollars;

pub use american_innovation_dollars::AmericanInnovationDollars;
pub use native_american_dollars::NativeAmericanDollars;
pub use presidential_dollars::PresidentialDollars;

use crate::coin::CoinSlot;
use crate::error::Result;
use crate::generator;
use crate::params::CreationParameters;

/// The current version of the static catalog.
///
/// Bumped whenever a series gains a new production year; the upgrade stepper
/// replays the steps between a database's stored version and this one.
pub const CURRENT_CATALOG_VERSION: i32 = 14;

/// The year "still in production" resolves to.
///
/// Series whose stop year tracks current production use this constant; it is
/// bumped together with [`CURRENT_CATALOG_VERSION`] and a matching upgrade
/// step when a new production year ships.
pub const CURRENT_PRODUCTION_YEAR: u16 = 2020;

/// A production year introduced at a given catalog version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeStep {
    /// The catalog version that first includes this year.
    pub version: i32,
    /// The year added.
    pub year: u16,
}

/// A coin series descriptor.
///
/// Implementations are stateless; the registry hands out `'static` references.
pub trait CoinSeries: Send + Sync {
    /// Display name, e.g. "Native American Dollars".
    fn name(&self) -> &'static str;

    /// First year of production.
    fn start_year(&self) -> u16;

    /// Last year in the catalog (often [`CURRENT_PRODUCTION_YEAR`]).
    fn stop_year(&self) -> u16;

    /// The default creation parameters for this series.
    fn default_parameters(&self) -> CreationParameters;

    /// Years added after the series entered the catalog, with the catalog
    /// version that introduced each. Sorted by version ascending.
    fn upgrade_steps(&self) -> &'static [UpgradeStep] {
        &[]
    }

    /// Generate the slot list for a (possibly user-modified) parameter set.
    ///
    /// The default implementation resolves against this series' defaults and
    /// runs the generic generator; series with extra flags override this.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the parameter set doesn't resolve.
    fn populate(&self, params: &CreationParameters) -> Result<Vec<CoinSlot>> {
        let plan = params.resolve(&self.default_parameters())?;
        Ok(generator::generate(&plan))
    }

    /// URL/CLI-friendly identifier derived from the name.
    fn slug(&self) -> String {
        slugify(self.name())
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// All registered series, in display order.
#[must_use]
pub fn all() -> &'static [&'static dyn CoinSeries] {
    static REGISTRY: [&dyn CoinSeries; 3] = [
        &NativeAmericanDollars,
        &PresidentialDollars,
        &AmericanInnovationDollars,
    ];
    &REGISTRY
}

/// Look up a series by display name or slug, case-insensitively.
#[must_use]
pub fn find(name: &str) -> Option<&'static dyn CoinSeries> {
    let needle = name.trim();
    all().iter().copied().find(|series| {
        series.name().eq_ignore_ascii_case(needle) || series.slug().eq_ignore_ascii_case(needle)
    })
}
