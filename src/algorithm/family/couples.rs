//! Reference families, couples and singletons
//!
//! Rules 10 to 34. Each rule selects from the individuals left unassigned by
//! the rules before it and only ever appends.

use rustc_hash::FxHashSet;

use super::cascade::Cascade;
use crate::error::Result;
use crate::models::family::{FamilyAssignment, Rule};
use crate::models::individual::{HouseholdRole, Individual, Sex, TaxRole};
use crate::utils::logging::log_anomaly;

/// Rule 10: the reference person's family
///
/// The reference person, their partner, minor children and young adult
/// children below the income floor all anchor on the household's reference
/// person.
pub fn assign_reference_families(cascade: &mut Cascade) -> Result<()> {
    let mut assignments = Vec::new();
    let mut without_reference = 0;

    for individual in cascade.unassigned().filter(|i| belongs_to_reference_family(i)) {
        match cascade.base.reference_person_index(individual.household_id) {
            Some(anchor) => assignments.push(FamilyAssignment::anchored_on(
                individual,
                anchor,
                Rule::ReferencePerson,
                individual.is_role(HouseholdRole::ChildOfReference),
            )),
            None => without_reference += 1,
        }
    }

    cascade.report.households_without_reference += without_reference;
    log_anomaly(
        "members of households without a reference person left for later rules",
        without_reference,
    );
    cascade.append("reference families", assignments)?;
    Ok(())
}

/// Members of the reference couple and their dependent children
#[must_use]
pub fn belongs_to_reference_family(individual: &Individual) -> bool {
    match individual.role {
        HouseholdRole::ReferencePerson | HouseholdRole::Partner => true,
        HouseholdRole::ChildOfReference => {
            individual.is_minor() || (individual.is_young_adult() && !individual.clears_wage_floor)
        }
        HouseholdRole::Other => false,
    }
}

/// Rules 21 and 22: couples outside the reference couple
///
/// Men anchor on themselves, women on their declared partner. A woman is only
/// kept when her family matches one of the men's families.
pub fn assign_couples(cascade: &mut Cascade) -> Result<()> {
    let men: Vec<FamilyAssignment> = cascade
        .unassigned()
        .filter(|i| is_cohabiting_member(i, Sex::Male))
        .map(|i| FamilyAssignment::own_family(i, Rule::CoupleMan))
        .collect();
    let men_families: FxHashSet<i64> = men.iter().map(|row| row.family_id).collect();

    let mut women = Vec::new();
    let mut unmatched = 0;
    for woman in cascade
        .unassigned()
        .filter(|i| is_cohabiting_member(i, Sex::Female))
    {
        let Some(partner) = woman.partner_index else {
            continue;
        };
        let family_id = woman.family_id_for(partner);
        if men_families.contains(&family_id) {
            women.push(FamilyAssignment::in_family(
                woman,
                family_id,
                Rule::CoupleWoman,
                false,
            ));
        } else {
            unmatched += 1;
        }
    }
    log::debug!("{unmatched} cohabiting women without a matching partner family");

    let mut assignments = men;
    assignments.extend(women);
    cascade.append("couples", assignments)?;
    Ok(())
}

fn is_cohabiting_member(individual: &Individual, sex: Sex) -> bool {
    individual.is_dependent_member() && individual.cohabits && individual.sex == Some(sex)
}

/// Rules 31 to 34: singleton families, each on the fresh remainder
pub fn assign_singles(cascade: &mut Cascade) -> Result<()> {
    let rules: [(Rule, fn(&Individual) -> bool); 4] = [
        (Rule::SingleCohabitingWoman, is_single_cohabiting_woman),
        (Rule::SingleYoungEarner, is_single_young_earner),
        (Rule::SingleAdult, is_single_adult),
        (Rule::SingleYoungDeclarant, is_single_young_declarant),
    ];

    for (rule, predicate) in rules {
        let assignments: Vec<FamilyAssignment> = cascade
            .unassigned()
            .filter(|i| predicate(i))
            .map(|i| FamilyAssignment::own_family(i, rule))
            .collect();
        cascade.append(&format!("rule {}", rule.code()), assignments)?;
    }
    Ok(())
}

fn is_single_cohabiting_woman(i: &Individual) -> bool {
    i.is_dependent_member()
        && i.cohabits
        && i.sex == Some(Sex::Female)
        && ((i.is_young_adult() && i.clears_wage_floor) || i.is_adult())
}

/// Young earner of either sex living without a partner
fn is_single_young_earner(i: &Individual) -> bool {
    i.is_dependent_member() && !i.cohabits && i.is_young_adult() && i.clears_wage_floor
}

fn is_single_adult(i: &Individual) -> bool {
    i.is_dependent_member() && !i.cohabits && i.is_adult()
}

fn is_single_young_declarant(i: &Individual) -> bool {
    i.is_role(HouseholdRole::Other)
        && i.is_young_adult()
        && !i.clears_wage_floor
        && i.mother_index.is_none()
        && i.tax_role == Some(TaxRole::Declarant)
}
