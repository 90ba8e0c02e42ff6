//! Creation parameters and their resolution into a generation plan.
//!
//! A series descriptor supplies a default `CreationParameters`; user input
//! overrides individual fields before the set is resolved. Resolution
//! validates the overrides and produces the concrete iteration plan
//! (years × mint marks) the generator runs over.

use serde::Serialize;

use crate::error::{Error, Result};

/// A labelled mint-mark toggle.
///
/// The declared order of these options in a parameter set is the order mint
/// marks are emitted within a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintMarkOption {
    /// The mint mark letter(s), e.g. "P".
    pub mark: &'static str,
    /// User-facing label, e.g. "Philadelphia".
    pub label: &'static str,
    /// Whether coins from this mint are included.
    pub enabled: bool,
}

/// A standalone extra flag a series may expose (e.g. "Include proofs").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxOption {
    /// Stable key for the flag.
    pub key: &'static str,
    /// User-facing label.
    pub label: &'static str,
    /// Whether the flag is set.
    pub enabled: bool,
}

/// The full set of user-tunable options for creating a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationParameters {
    /// Whether the user may narrow the year range.
    pub edit_date_range: bool,
    /// First year of the range.
    pub start_year: u16,
    /// Last year of the range.
    pub stop_year: u16,
    /// Whether mint marks are tracked at all. When false a single slot with
    /// an empty mint mark is emitted per year.
    pub show_mint_marks: bool,
    /// Mint-mark toggles, in emission order.
    pub mint_marks: Vec<MintMarkOption>,
    /// Extra per-series flags.
    pub checkboxes: Vec<CheckboxOption>,
}

impl CreationParameters {
    /// The enabled mint marks, in declared order.
    #[must_use]
    pub fn enabled_marks(&self) -> Vec<&'static str> {
        self.mint_marks
            .iter()
            .filter(|opt| opt.enabled)
            .map(|opt| opt.mark)
            .collect()
    }

    /// Enable or disable a mint mark by its letter.
    ///
    /// Returns `false` if the series has no such mint-mark option.
    pub fn set_mark(&mut self, mark: &str, enabled: bool) -> bool {
        match self.mint_marks.iter_mut().find(|opt| opt.mark == mark) {
            Some(opt) => {
                opt.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Disable every mint-mark toggle.
    pub fn clear_marks(&mut self) {
        for opt in &mut self.mint_marks {
            opt.enabled = false;
        }
    }

    /// Look up an extra flag by key.
    #[must_use]
    pub fn checkbox(&self, key: &str) -> Option<bool> {
        self.checkboxes
            .iter()
            .find(|opt| opt.key == key)
            .map(|opt| opt.enabled)
    }

    /// Set an extra flag by key. Returns `false` if the key is unknown.
    pub fn set_checkbox(&mut self, key: &str, enabled: bool) -> bool {
        match self.checkboxes.iter_mut().find(|opt| opt.key == key) {
            Some(opt) => {
                opt.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Resolve this parameter set into a concrete generation plan.
    ///
    /// `defaults` is the series' untouched parameter set; its year range is
    /// the widest range the series allows.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the year range falls outside the series
    /// bounds, start exceeds stop, or mint marks are shown with none enabled.
    pub fn resolve(&self, defaults: &CreationParameters) -> Result<GenerationPlan> {
        let (start_year, stop_year) = if self.edit_date_range {
            self.validate_years(defaults)?;
            (self.start_year, self.stop_year)
        } else {
            (defaults.start_year, defaults.stop_year)
        };

        let mint_marks = if self.show_mint_marks {
            let marks = self.enabled_marks();
            if marks.is_empty() {
                return Err(Error::NoMintMarkSelected);
            }
            marks.iter().map(|m| (*m).to_string()).collect()
        } else {
            vec![String::new()]
        };

        Ok(GenerationPlan {
            start_year,
            stop_year,
            mint_marks,
        })
    }

    fn validate_years(&self, defaults: &CreationParameters) -> Result<()> {
        let min = defaults.start_year;
        let max = defaults.stop_year;

        if self.stop_year > max {
            return Err(Error::invalid_date_range(format!(
                "highest possible ending year is {max} (new years are added as they come)"
            )));
        }
        if self.stop_year < min {
            return Err(Error::invalid_date_range(format!(
                "ending year can't be before the series starting year ({min})"
            )));
        }
        if self.start_year < min {
            return Err(Error::invalid_date_range(format!(
                "lowest possible starting year is {min}"
            )));
        }
        if self.start_year > max {
            return Err(Error::invalid_date_range(format!(
                "starting year can't be after the series ending year ({max})"
            )));
        }
        if self.start_year > self.stop_year {
            return Err(Error::invalid_date_range(
                "starting year can't be after the ending year",
            ));
        }
        Ok(())
    }
}

/// The resolved iteration plan the generator runs over.
///
/// `mint_marks` always has at least one entry; a single empty string means
/// the series doesn't distinguish mints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// First year, inclusive.
    pub start_year: u16,
    /// Last year, inclusive.
    pub stop_year: u16,
    /// Mint marks to emit per year, in order.
    pub mint_marks: Vec<String>,
}

impl GenerationPlan {
    /// Number of slots this plan will generate.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        if self.start_year > self.stop_year {
            return 0;
        }
        usize::from(self.stop_year - self.start_year + 1) * self.mint_marks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> CreationParameters {
        CreationParameters {
            edit_date_range: false,
            start_year: 2000,
            stop_year: 2020,
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

    #[test]
    fn test_enabled_marks_declared_order() {
        let mut params = sample_params();
        params.set_mark("D", true);
        assert_eq!(params.enabled_marks(), vec!["P", "D"]);
    }

    #[test]
    fn test_set_mark_unknown() {
        let mut params = sample_params();
        assert!(!params.set_mark("S", true));
        assert!(params.set_mark("D", true));
    }

    #[test]
    fn test_clear_marks() {
        let mut params = sample_params();
        params.clear_marks();
        assert!(params.enabled_marks().is_empty());
    }

    #[test]
    fn test_checkbox_lookup() {
        let mut params = sample_params();
        params.checkboxes.push(CheckboxOption {
            key: "proofs",
            label: "Include proofs",
            enabled: false,
        });
        assert_eq!(params.checkbox("proofs"), Some(false));
        assert!(params.set_checkbox("proofs", true));
        assert_eq!(params.checkbox("proofs"), Some(true));
        assert_eq!(params.checkbox("missing"), None);
        assert!(!params.set_checkbox("missing", true));
    }

    #[test]
    fn test_resolve_defaults() {
        let defaults = sample_params();
        let plan = defaults.resolve(&defaults).unwrap();
        assert_eq!(plan.start_year, 2000);
        assert_eq!(plan.stop_year, 2020);
        assert_eq!(plan.mint_marks, vec!["P".to_string()]);
    }

    #[test]
    fn test_resolve_no_mint_marks_gives_empty_mark() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.show_mint_marks = false;
        let plan = params.resolve(&defaults).unwrap();
        assert_eq!(plan.mint_marks, vec![String::new()]);
    }

    #[test]
    fn test_resolve_no_mark_selected() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.clear_marks();
        let err = params.resolve(&defaults).unwrap_err();
        assert!(matches!(err, Error::NoMintMarkSelected));
    }

    #[test]
    fn test_resolve_edited_range() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.edit_date_range = true;
        params.start_year = 2009;
        params.stop_year = 2011;
        let plan = params.resolve(&defaults).unwrap();
        assert_eq!(plan.start_year, 2009);
        assert_eq!(plan.stop_year, 2011);
    }

    #[test]
    fn test_resolve_unedited_range_ignores_overrides() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.start_year = 2009;
        params.stop_year = 2011;
        // edit_date_range is false, so the series defaults win
        let plan = params.resolve(&defaults).unwrap();
        assert_eq!(plan.start_year, 2000);
        assert_eq!(plan.stop_year, 2020);
    }

    #[test]
    fn test_resolve_stop_year_too_high() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.edit_date_range = true;
        params.stop_year = 2025;
        let err = params.resolve(&defaults).unwrap_err();
        assert!(err.to_string().contains("2020"));
    }

    #[test]
    fn test_resolve_start_year_too_low() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.edit_date_range = true;
        params.start_year = 1990;
        let err = params.resolve(&defaults).unwrap_err();
        assert!(err.to_string().contains("2000"));
    }

    #[test]
    fn test_resolve_start_after_stop() {
        let defaults = sample_params();
        let mut params = sample_params();
        params.edit_date_range = true;
        params.start_year = 2015;
        params.stop_year = 2010;
        let err = params.resolve(&defaults).unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange { .. }));
    }

    #[test]
    fn test_plan_slot_count() {
        let plan = GenerationPlan {
            start_year: 2009,
            stop_year: 2011,
            mint_marks: vec!["P".to_string(), "D".to_string()],
        };
        assert_eq!(plan.slot_count(), 6);
    }

    #[test]
    fn test_plan_slot_count_empty_range() {
        let plan = GenerationPlan {
            start_year: 2011,
            stop_year: 2009,
            mint_marks: vec!["P".to_string()],
        };
        assert_eq!(plan.slot_count(), 0);
    }
}
