//! Slot list generation.
//!
//! Turns a resolved [`GenerationPlan`] into the ordered list of coin slots a
//! new collection starts with. Pure function of its input; ordering is
//! (year ascending, mint mark in plan order).

use crate::coin::CoinSlot;
use crate::params::GenerationPlan;

/// Generate the ordered slot list for a plan.
///
/// Emits one slot per (year, mint mark) pair. A start year after the stop
/// year yields an empty list, not an error.
#[must_use]
pub fn generate(plan: &GenerationPlan) -> Vec<CoinSlot> {
    let mut slots = Vec::with_capacity(plan.slot_count());
    if plan.start_year > plan.stop_year {
        return slots;
    }
    for year in plan.start_year..=plan.stop_year {
        for mark in &plan.mint_marks {
            slots.push(CoinSlot::new(year.to_string(), mark.clone()));
        }
    }
    slots
}

/// Generate the slots for a single year using the given mint marks.
///
/// Used by the catalog upgrade stepper when appending a newly introduced
/// year to an existing collection.
#[must_use]
pub fn generate_year(year: u16, mint_marks: &[String]) -> Vec<CoinSlot> {
    mint_marks
        .iter()
        .map(|mark| CoinSlot::new(year.to_string(), mark.clone()))
        .collect()
}
