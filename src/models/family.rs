//! Family assignment models
//!
//! `FamilyAssignment` is one row of the accumulating result table.
//! `FamilyMember` is a finalized row with head, rank and role, and
//! `FamilyRecord` is the three-column output relation persisted to the store.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use super::individual::Individual;
use crate::error::Result;
use crate::schema::family_schema;

/// Role code of the family head
pub const HEAD_ROLE: i32 = 0;
/// Role code of a spouse or any other adult member
pub const SPOUSE_ROLE: i32 = 1;
/// Role code of the first-ranked child
pub const FIRST_CHILD_ROLE: i32 = 2;

/// Classification rule, in priority order
///
/// The discriminant is the rule code recorded as provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    /// Reference person, partner and dependent children of the household
    ReferencePerson = 10,
    /// Cohabiting man outside the reference couple
    CoupleMan = 21,
    /// Cohabiting woman attached to her partner
    CoupleWoman = 22,
    /// Cohabiting woman whose partner was not matched
    SingleCohabitingWoman = 31,
    /// Self-supporting young adult living alone
    SingleYoungEarner = 32,
    /// Adult living alone
    SingleAdult = 33,
    /// Young adult filing their own tax return
    SingleYoungDeclarant = 34,
    ChildOfMother = 41,
    Mother = 42,
    MotherPartner = 43,
    ChildOfFather = 44,
    Father = 45,
    FatherPartner = 46,
    ChildOfDeclarant = 47,
    Declarant = 48,
    /// Tax-only child attached to their declarant
    SecondaryChild = 50,
    /// Declarant of a tax-only child
    SecondaryDeclarant = 51,
    ResidualMinor = 61,
    ResidualYoungAdult = 62,
    ResidualSingle = 63,
}

impl Rule {
    /// Numeric rule code
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// One individual's provisional family link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyAssignment {
    pub individual_id: i64,
    pub household_id: i64,
    pub person_index: i64,
    /// `100 * household_id + anchor_person_index`
    pub family_id: i64,
    pub rule: Rule,
    pub is_child: bool,
}

impl FamilyAssignment {
    /// Link `individual` to the family anchored on `anchor_index` of the same
    /// household
    #[must_use]
    pub const fn anchored_on(
        individual: &Individual,
        anchor_index: i64,
        rule: Rule,
        is_child: bool,
    ) -> Self {
        Self {
            individual_id: individual.id,
            household_id: individual.household_id,
            person_index: individual.person_index,
            family_id: individual.family_id_for(anchor_index),
            rule,
            is_child,
        }
    }

    /// Link `individual` to an already computed family key
    #[must_use]
    pub const fn in_family(
        individual: &Individual,
        family_id: i64,
        rule: Rule,
        is_child: bool,
    ) -> Self {
        Self {
            individual_id: individual.id,
            household_id: individual.household_id,
            person_index: individual.person_index,
            family_id,
            rule,
            is_child,
        }
    }

    /// Singleton family anchored on the individual
    #[must_use]
    pub const fn own_family(individual: &Individual, rule: Rule) -> Self {
        Self::anchored_on(individual, individual.person_index, rule, false)
    }

    /// The individual anchors their own family
    #[must_use]
    pub const fn is_self_anchored(&self) -> bool {
        self.family_id == self.individual_id
    }
}

/// Finalized family member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMember {
    pub individual_id: i64,
    pub family_id: i64,
    pub rule: Rule,
    pub is_child: bool,
    pub is_head: bool,
    /// 1-based rank among the children of the family, 0 for adults
    pub rank: u32,
    pub role_code: i32,
}

impl FamilyMember {
    #[must_use]
    pub const fn to_record(&self) -> FamilyRecord {
        FamilyRecord {
            individual_id: self.individual_id,
            role_code: self.role_code,
            family_id: self.family_id,
        }
    }
}

/// Output row: (individual, role in family, family)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyRecord {
    #[serde(rename = "noindiv")]
    pub individual_id: i64,
    #[serde(rename = "quifam")]
    pub role_code: i32,
    #[serde(rename = "idfam")]
    pub family_id: i64,
}

impl FamilyRecord {
    /// Convert records to a batch with the declared family schema
    pub fn to_record_batch(records: &[Self]) -> Result<RecordBatch> {
        let schema = family_schema();
        Ok(serde_arrow::to_record_batch(schema.fields(), &records)?)
    }

    /// Read records back from a family batch
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }
}
