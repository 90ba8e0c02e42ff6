//! Presidential dollars (2007–2016).

use crate::params::{CreationParameters, MintMarkOption};

use super::{CoinSeries, UpgradeStep};

/// The Presidential dollar series. Production ended in 2016, so the year
/// range is closed and the user may narrow it.
#[derive(Debug, Clone, Copy)]
pub struct PresidentialDollars;

const START_YEAR: u16 = 2007;
const STOP_YEAR: u16 = 2016;

const UPGRADE_STEPS: &[UpgradeStep] = &[
    UpgradeStep {
        version: 3,
        year: 2012,
    },
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
];

impl CoinSeries for PresidentialDollars {
    fn name(&self) -> &'static str {
        "Presidential Dollars"
    }

    fn start_year(&self) -> u16 {
        START_YEAR
    }

    fn stop_year(&self) -> u16 {
        STOP_YEAR
    }

    fn default_parameters(&self) -> CreationParameters {
        CreationParameters {
            edit_date_range: true,
            start_year: START_YEAR,
            stop_year: STOP_YEAR,
            show_mint_marks: true,
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
