//! Residual rules
//!
//! Rules 61 to 63 place every survey individual still unassigned: remaining
//! children go to the reference person's family and everyone else forms a
//! singleton family. Tax-only rows are never placed here.

use super::cascade::Cascade;
use crate::error::{Result, ensure};
use crate::models::family::{FamilyAssignment, Rule};
use crate::models::individual::Individual;

/// Minimum age of the reference person for a young adult relative to count as
/// their child
pub const MIN_REFERENCE_PERSON_AGE: i32 = 35;

/// Remaining minor, or young adult close relative of an older reference person
#[must_use]
pub fn is_residual_child(individual: &Individual) -> bool {
    individual.is_minor()
        || (individual.is_young_adult()
            && individual
                .relationship_code
                .is_some_and(|code| (1..=4).contains(&code))
            && individual
                .reference_person_age
                .is_some_and(|age| age >= MIN_REFERENCE_PERSON_AGE))
}

/// Rules 61 and 62: remaining children anchored on the reference person
pub fn attach_residual_children(cascade: &mut Cascade) -> Result<()> {
    let mut assignments = Vec::new();
    let mut skipped = 0;
    for individual in cascade
        .unassigned()
        .filter(|i| !i.is_tax_only() && is_residual_child(i))
    {
        let Some(anchor) = cascade.base.reference_person_index(individual.household_id) else {
            skipped += 1;
            continue;
        };
        let rule = if individual.is_minor() {
            Rule::ResidualMinor
        } else {
            Rule::ResidualYoungAdult
        };
        assignments.push(FamilyAssignment::anchored_on(individual, anchor, rule, true));
    }
    if skipped > 0 {
        log::debug!("{skipped} residual children without a reference person left as singletons");
    }
    cascade.append("residual children", assignments)?;
    Ok(())
}

/// Rule 63: everyone left forms their own family
///
/// # Errors
/// Returns an invariant violation if a survey individual is still unassigned
/// afterwards.
pub fn assign_residual_singles(cascade: &mut Cascade) -> Result<()> {
    let assignments: Vec<FamilyAssignment> = cascade
        .unassigned()
        .filter(|i| !i.is_tax_only())
        .map(|i| FamilyAssignment::own_family(i, Rule::ResidualSingle))
        .collect();
    cascade.append("residual singles", assignments)?;

    let remaining = cascade.unassigned().filter(|i| !i.is_tax_only()).count();
    ensure(remaining == 0, || {
        format!("{remaining} survey individuals still unassigned after the residual rules")
    })
}
