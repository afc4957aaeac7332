//! Tax-only individuals
//!
//! Rules 50 and 51. People known only from a tax return are attached to the
//! declarant of that return when they are young adults without their own
//! income or were born in the year before the survey. Admitted individuals
//! join the base table.

use rustc_hash::FxHashSet;

use super::cascade::Cascade;
use crate::error::{FamilyError, Result};
use crate::models::family::{FamilyAssignment, Rule};
use crate::models::individual::Individual;

/// Tax relationship code of a child born during the income year
pub const NEWBORN_TAX_RELATIONSHIP: i32 = 6;
/// Ages at which a tax-only young adult may still be a dependent child
pub const DEPENDENT_ADULT_AGES: [i32; 2] = [19, 20];

/// Whether a tax-only individual qualifies as a child of their declarant
#[must_use]
pub fn is_secondary_child(individual: &Individual, year: i32) -> bool {
    let dependent_adult = individual
        .age
        .is_some_and(|age| DEPENDENT_ADULT_AGES.contains(&age))
        && !individual.clears_wage_floor;
    let newborn = individual.birth_year == Some(year - 1)
        && individual.tax_relationship_code == Some(NEWBORN_TAX_RELATIONSHIP);
    dependent_adult || newborn
}

/// Rules 50 and 51: merge tax-only individuals
///
/// Candidates are the unassigned tax-only rows already in the base plus the
/// `secondary` rows not yet in the base. Only children whose declarant is in
/// the base are admitted.
///
/// # Errors
/// Returns an invariant violation when an individual is selected both as a
/// child and as a declarant.
pub fn merge_secondary(cascade: &mut Cascade, secondary: Vec<Individual>, year: i32) -> Result<()> {
    let stage = "tax-only individuals";
    cascade.report.secondary_rows = secondary.len();

    let mut seen: FxHashSet<i64> = FxHashSet::default();
    let mut candidates: Vec<Individual> = cascade
        .unassigned()
        .filter(|i| i.is_tax_only())
        .cloned()
        .collect();
    seen.extend(candidates.iter().map(|i| i.id));
    candidates.extend(
        secondary
            .into_iter()
            .filter(|i| !cascade.base.contains(i.id) && seen.insert(i.id)),
    );

    let mut child_rows = Vec::new();
    let mut declarant_rows = Vec::new();
    let mut declarants = FxHashSet::default();
    let mut admitted = Vec::new();
    let mut unresolved = 0;

    for child in candidates.into_iter().filter(|i| is_secondary_child(i, year)) {
        let Some(declarant) = child
            .declarant_index
            .and_then(|index| cascade.base.get(child.family_id_for(index)))
        else {
            unresolved += 1;
            continue;
        };
        child_rows.push(FamilyAssignment::anchored_on(
            &child,
            declarant.person_index,
            Rule::SecondaryChild,
            true,
        ));
        if declarants.insert(declarant.id) {
            declarant_rows.push(FamilyAssignment::own_family(declarant, Rule::SecondaryDeclarant));
        }
        if !cascade.base.contains(child.id) {
            admitted.push(child);
        }
    }

    if let Some(collision) = child_rows.iter().find(|row| declarants.contains(&row.individual_id)) {
        return Err(FamilyError::invariant(format!(
            "{stage}: individual {} is both a child and a declarant",
            collision.individual_id
        )));
    }

    cascade.record_unresolved(stage, unresolved);
    cascade.report.secondary_admitted = admitted.len();
    log::info!("Admitting {} tax-only individuals to the base", admitted.len());
    cascade.base.extend(admitted);

    let mut assignments = child_rows;
    assignments.extend(declarant_rows);
    cascade.merge_last_wins(stage, assignments)?;
    Ok(())
}
