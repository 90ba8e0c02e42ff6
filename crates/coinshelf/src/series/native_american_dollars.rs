//! Sacagawea / Native American dollars (2000–present).

use crate::params::{CreationParameters, MintMarkOption};

use super::{CoinSeries, UpgradeStep, CURRENT_PRODUCTION_YEAR};

/// Sacagawea dollars and their Native American reverse-design successors.
///
/// Minted at Philadelphia and Denver; the series tracks current production,
/// so its stop year follows the catalog.
#[derive(Debug, Clone, Copy)]
pub struct NativeAmericanDollars;

const START_YEAR: u16 = 2000;

// Years added to the catalog after the series first shipped.
const UPGRADE_STEPS: &[UpgradeStep] = &[
    UpgradeStep {
        version: 4,
        year: 2013,
    },
    UpgradeStep {
        version: 5,
        year: 2014,
    },
    UpgradeStep {
        version: 7,
        year: 2015,
    },
    UpgradeStep {
        version: 8,
        year: 2016,
    },
    UpgradeStep {
        version: 9,
        year: 2017,
    },
    UpgradeStep {
        version: 12,
        year: 2018,
    },
    UpgradeStep {
        version: 13,
        year: 2019,
    },
    UpgradeStep {
        version: 14,
        year: 2020,
    },
];

impl CoinSeries for NativeAmericanDollars {
    fn name(&self) -> &'static str {
        "Native American Dollars"
    }

    fn start_year(&self) -> u16 {
        START_YEAR
    }

    fn stop_year(&self) -> u16 {
        CURRENT_PRODUCTION_YEAR
    }

    fn default_parameters(&self) -> CreationParameters {
        CreationParameters {
            edit_date_range: false,
            start_year: START_YEAR,
            stop_year: CURRENT_PRODUCTION_YEAR,
            show_mint_marks: false,
            mint_marks: vec![
                MintMarkOption {
                    mark: "P",
                    label: "Philadelphia",
                    enabled: true,
                },
                MintMarkOption {
                    mark: "D",
                    label: "Denver",
                    enabled: false,
                },
            ],
            checkboxes: vec![],
        }
    }

    fn upgrade_steps(&self) -> &'static [UpgradeStep] {
        UPGRADE_STEPS
    }
}
