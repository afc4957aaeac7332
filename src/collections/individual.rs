//! Base table of individuals
//!
//! The base table is the population every rule selects from. It is built once
//! per run and only grows: first with admitted future children, later with the
//! tax-only individuals admitted by the secondary merge.

use rustc_hash::FxHashMap;

use crate::collections::family::FamilyTable;
use crate::models::individual::{HouseholdRole, Individual};

/// Ordered individuals indexed by id
#[derive(Debug, Default, Clone)]
pub struct IndividualTable {
    /// Rows in input order
    rows: Vec<Individual>,
    /// Row position by individual id
    index: FxHashMap<i64, usize>,
    /// Person index of the reference person by household
    reference_persons: FxHashMap<i64, i64>,
    /// Rows dropped because their id was already present
    duplicate_ids: usize,
    /// Households declaring more than one reference person
    extra_reference_persons: usize,
}

impl IndividualTable {
    /// Create a new empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from individuals, keeping the first row of any repeated id
    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        let mut table = Self::new();
        table.extend(individuals);
        table
    }

    /// Append individuals, keeping the first row of any repeated id
    ///
    /// Reference persons are only taken from survey rows; tax-only rows never
    /// anchor a household.
    pub fn extend(&mut self, individuals: impl IntoIterator<Item = Individual>) {
        for individual in individuals {
            if self.index.contains_key(&individual.id) {
                self.duplicate_ids += 1;
                continue;
            }
            if individual.is_role(HouseholdRole::ReferencePerson) && !individual.is_tax_only() {
                if self.reference_persons.contains_key(&individual.household_id) {
                    self.extra_reference_persons += 1;
                } else {
                    self.reference_persons
                        .insert(individual.household_id, individual.person_index);
                }
            }
            self.index.insert(individual.id, self.rows.len());
            self.rows.push(individual);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up an individual by id
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Individual> {
        self.index.get(&id).map(|&pos| &self.rows[pos])
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterate over all rows in input order
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.rows.iter()
    }

    /// Rows not yet claimed by any family, in input order
    pub fn unassigned<'a>(
        &'a self,
        families: &'a FamilyTable,
    ) -> impl Iterator<Item = &'a Individual> + 'a {
        self.rows
            .iter()
            .filter(move |individual| !families.is_claimed(individual.id))
    }

    /// Person index of the household's reference person
    #[must_use]
    pub fn reference_person_index(&self, household_id: i64) -> Option<i64> {
        self.reference_persons.get(&household_id).copied()
    }

    /// Rows dropped on insertion because their id already existed
    #[must_use]
    pub const fn duplicate_ids(&self) -> usize {
        self.duplicate_ids
    }

    /// Households that declared more than one reference person
    #[must_use]
    pub const fn extra_reference_persons(&self) -> usize {
        self.extra_reference_persons
    }
}
