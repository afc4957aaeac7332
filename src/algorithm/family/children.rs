//! Children attached through a parent or a tax declarant
//!
//! Rules 41 to 48. These rules promote: the parent (and the parent's partner)
//! are evicted from whatever family an earlier rule gave them and become the
//! head of the family anchored on the parent.

use rustc_hash::FxHashSet;

use super::cascade::Cascade;
use crate::error::{FamilyError, Result};
use crate::models::family::{FamilyAssignment, Rule};
use crate::models::individual::{HouseholdRole, Individual, TaxRole};
use crate::utils::logging::log_anomaly;

/// Which declared parent a child is attached through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    Mother,
    Father,
}

impl ParentLink {
    /// Person index of the linked parent
    #[must_use]
    pub const fn index(self, individual: &Individual) -> Option<i64> {
        match self {
            Self::Mother => individual.mother_index,
            Self::Father => individual.father_index,
        }
    }

    /// Rules for the child, the parent and the parent's partner
    #[must_use]
    pub const fn rules(self) -> (Rule, Rule, Rule) {
        match self {
            Self::Mother => (Rule::ChildOfMother, Rule::Mother, Rule::MotherPartner),
            Self::Father => (Rule::ChildOfFather, Rule::Father, Rule::FatherPartner),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
        }
    }
}

/// Unassigned relative young enough to be attached to a parent
fn is_attachable_child(individual: &Individual) -> bool {
    individual.is_role(HouseholdRole::Other)
        && (individual.is_young_adult() || individual.is_minor())
}

/// Rules 41 to 46: children attached to the declared mother, then father
pub fn attach_to_parent(cascade: &mut Cascade, link: ParentLink) -> Result<()> {
    let (child_rule, parent_rule, partner_rule) = link.rules();
    let stage = format!("children of {}", link.label());

    let children: Vec<&Individual> = cascade
        .unassigned()
        .filter(|i| is_attachable_child(i) && link.index(i).is_some())
        .collect();

    let mut child_rows = Vec::new();
    let mut parent_rows = Vec::new();
    let mut partner_rows = Vec::new();
    let mut removals = FxHashSet::default();
    let mut unresolved = 0;

    for child in children {
        let parent_index = link.index(child).ok_or_else(|| {
            FamilyError::invariant(format!(
                "{stage}: child {} selected without a {} link",
                child.id,
                link.label()
            ))
        })?;
        let Some(parent) = cascade.base.get(child.family_id_for(parent_index)) else {
            unresolved += 1;
            continue;
        };
        child_rows.push(FamilyAssignment::anchored_on(child, parent_index, child_rule, true));

        if !removals.insert(parent.id) {
            continue;
        }
        parent_rows.push(FamilyAssignment::own_family(parent, parent_rule));
        if let Some(partner) = parent
            .partner_index
            .and_then(|index| cascade.base.get(parent.family_id_for(index)))
        {
            removals.insert(partner.id);
            partner_rows.push(FamilyAssignment::in_family(partner, parent.id, partner_rule, false));
        }
    }

    cascade.record_unresolved(&stage, unresolved);
    let mut assignments = child_rows;
    assignments.extend(parent_rows);
    assignments.extend(partner_rows);
    cascade.promote(&stage, &removals, assignments)?;
    Ok(())
}

/// Dependent relative listed on a tax return, young enough to be a child
fn is_tax_dependent(individual: &Individual) -> bool {
    individual.is_role(HouseholdRole::Other)
        && individual.tax_role == Some(TaxRole::Dependent)
        && ((individual.is_young_adult() && !individual.clears_wage_floor) || individual.is_minor())
}

/// Rules 47 and 48: dependents attached to the declarant of their tax return
pub fn attach_to_declarant(cascade: &mut Cascade) -> Result<()> {
    let stage = "children of declarant";
    let dependents: Vec<&Individual> = cascade.unassigned().filter(|i| is_tax_dependent(i)).collect();

    let mut child_rows = Vec::new();
    let mut declarant_rows = Vec::new();
    let mut removals = FxHashSet::default();
    let mut without_declarant = 0;
    let mut unresolved = 0;

    for child in dependents {
        let Some(declarant_index) = child.declarant_index else {
            without_declarant += 1;
            continue;
        };
        let Some(declarant) = cascade.base.get(child.family_id_for(declarant_index)) else {
            unresolved += 1;
            continue;
        };
        child_rows.push(FamilyAssignment::anchored_on(
            child,
            declarant_index,
            Rule::ChildOfDeclarant,
            true,
        ));
        if removals.insert(declarant.id) {
            declarant_rows.push(FamilyAssignment::own_family(declarant, Rule::Declarant));
        }
    }

    log_anomaly("dependents without a declarant left for residual rules", without_declarant);
    cascade.record_unresolved(stage, unresolved);
    let mut assignments = child_rows;
    assignments.extend(declarant_rows);
    cascade.promote(stage, &removals, assignments)?;
    Ok(())
}
