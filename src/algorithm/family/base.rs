//! Base table construction
//!
//! Assembles the working individual table from the main survey relation and
//! the future-children relation, and derives the typed flags every later rule
//! reads.

use rustc_hash::FxHashSet;

use super::statistics::RunReport;
use crate::collections::IndividualTable;
use crate::error::{Result, ensure};
use crate::models::individual::{HouseholdRole, Individual, IndividualRecord, SourceFile};
use crate::utils::logging::log_anomaly;

/// Relationship code of children placed with a relative
pub const PLACED_CHILD_RELATIONSHIP: i32 = 6;

/// Builds typed individuals for one survey year
#[derive(Debug, Clone, Copy)]
pub struct BaseTableBuilder {
    year: i32,
    wage_floor: f64,
}

impl BaseTableBuilder {
    /// Create a builder for `year` with its annual income floor
    #[must_use]
    pub const fn new(year: i32, wage_floor: f64) -> Self {
        Self { year, wage_floor }
    }

    /// Convert raw records to typed individuals
    pub fn individuals(&self, records: &[IndividualRecord]) -> Result<Vec<Individual>> {
        records
            .iter()
            .map(|record| Individual::from_record(record, self.year, self.wage_floor))
            .collect()
    }

    /// Convert tax-only records, skipping rows without a usable household
    /// role
    pub fn secondary_individuals(
        &self,
        records: &[IndividualRecord],
        report: &mut RunReport,
    ) -> Vec<Individual> {
        let mut individuals = Vec::with_capacity(records.len());
        for record in records {
            match Individual::from_record(record, self.year, self.wage_floor) {
                Ok(individual) => individuals.push(individual),
                Err(err) => {
                    log::debug!("Skipping tax-only individual {}: {err}", record.derived_id());
                    report.skipped_secondary += 1;
                }
            }
        }
        log_anomaly("tax-only rows without a usable household role", report.skipped_secondary);
        individuals
    }

    /// Build the base table
    ///
    /// # Arguments
    /// * `main` - Main survey individuals
    /// * `future_children` - Children expected but not yet born
    /// * `report` - Counters for the run
    pub fn build(
        &self,
        main: &[IndividualRecord],
        future_children: &[IndividualRecord],
        report: &mut RunReport,
    ) -> Result<IndividualTable> {
        report.main_rows = main.len();
        report.mismatched_ids += count_mismatched_ids(main) + count_mismatched_ids(future_children);
        log_anomaly("stored individual ids disagreeing with their keys", report.mismatched_ids);

        let individuals = self.individuals(main)?;
        let before = individuals.len();
        let individuals: Vec<Individual> = individuals
            .into_iter()
            .filter(|individual| !is_placed_child(individual))
            .collect();
        report.excluded_placed_children = before - individuals.len();
        log::info!(
            "Excluded {} placed children from {} main individuals",
            report.excluded_placed_children,
            before
        );

        let main_ids: FxHashSet<i64> = individuals.iter().map(|individual| individual.id).collect();
        let admitted = self.admit_future_children(future_children, &main_ids)?;
        report.future_children_admitted = admitted.len();
        log::info!(
            "Admitted {} of {} future children",
            admitted.len(),
            future_children.len()
        );

        let expected_max = individuals.len() + admitted.len();
        let mut table = IndividualTable::from_individuals(individuals);
        table.extend(admitted);
        log_anomaly("repeated individual ids dropped from the base", table.duplicate_ids());
        log_anomaly(
            "households declaring several reference persons",
            table.extra_reference_persons(),
        );

        ensure(table.len() <= expected_max, || {
            format!(
                "base table has {} rows, more than the {expected_max} admitted",
                table.len()
            )
        })?;
        log::info!("Base table contains {} rows", table.len());
        Ok(table)
    }

    /// Keep future children of the reference person that are not already
    /// enumerated, first occurrence of each id
    fn admit_future_children(
        &self,
        records: &[IndividualRecord],
        main_ids: &FxHashSet<i64>,
    ) -> Result<Vec<Individual>> {
        let mut seen = FxHashSet::default();
        let mut admitted = Vec::new();
        for record in records {
            if !seen.insert(record.derived_id()) {
                continue;
            }
            let individual = Individual::from_record(record, self.year, self.wage_floor)?;
            if individual.is_role(HouseholdRole::ChildOfReference) && !main_ids.contains(&individual.id)
            {
                admitted.push(individual);
            }
        }
        Ok(admitted)
    }
}

/// Minor recorded in the main survey as a relative placed in the household
#[must_use]
pub fn is_placed_child(individual: &Individual) -> bool {
    individual.relationship_code == Some(PLACED_CHILD_RELATIONSHIP)
        && individual.is_minor()
        && individual.source == SourceFile::MainSurvey
}

fn count_mismatched_ids(records: &[IndividualRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.individual_id.is_some_and(|id| id != record.derived_id()))
        .count()
}
