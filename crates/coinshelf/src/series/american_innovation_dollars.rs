//! American Innovation dollars (2018–present).

use crate::coin::CoinSlot;
use crate::error::Result;
use crate::generator;
use crate::params::{CheckboxOption, CreationParameters, MintMarkOption};

use super::{CoinSeries, UpgradeStep, CURRENT_PRODUCTION_YEAR};

/// The American Innovation dollar series.
///
/// 2018 carries only the introductory design; a checkbox lets the user leave
/// that year out and start with the 2019 per-state issues.
#[derive(Debug, Clone, Copy)]
pub struct AmericanInnovationDollars;

const START_YEAR: u16 = 2018;

/// Checkbox key for including the 2018 introductory dollar.
pub const OPT_INTRODUCTORY: &str = "introductory";

const UPGRADE_STEPS: &[UpgradeStep] = &[
    UpgradeStep {
        version: 13,
        year: 2019,
    },
    UpgradeStep {
        version: 14,
        year: 2020,
    },
];

impl CoinSeries for AmericanInnovationDollars {
    fn name(&self) -> &'static str {
        "American Innovation Dollars"
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
            checkboxes: vec![CheckboxOption {
                key: OPT_INTRODUCTORY,
                label: "Include the 2018 introductory dollar",
                enabled: true,
            }],
        }
    }

    fn upgrade_steps(&self) -> &'static [UpgradeStep] {
        UPGRADE_STEPS
    }

    fn populate(&self, params: &CreationParameters) -> Result<Vec<CoinSlot>> {
        let mut plan = params.resolve(&self.default_parameters())?;
        // Dropping the introductory coin shifts the start to the first
        // per-state year.
        if params.checkbox(OPT_INTRODUCTORY) == Some(false) && plan.start_year == START_YEAR {
            plan.start_year = START_YEAR + 1;
        }
        Ok(generator::generate(&plan))
    }
}
