//! Shared state of the rule cascade
//!
//! Every rule reads the still-unassigned part of the base table and hands its
//! assignments back through `append` (first assignment wins) or `promote`
//! (evict, then insert). Both re-check the table invariants before returning.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use super::statistics::RunReport;
use crate::collections::{FamilyTable, IndividualTable, InsertOutcome};
use crate::error::Result;
use crate::models::family::{FamilyAssignment, Rule};
use crate::models::individual::Individual;
use crate::utils::logging::{log_anomaly, log_rule_applied};

/// Base table, result table and counters of one run
#[derive(Debug)]
pub struct Cascade {
    pub base: IndividualTable,
    pub families: FamilyTable,
    pub report: RunReport,
}

impl Cascade {
    /// Start a cascade over a freshly built base table
    #[must_use]
    pub fn new(base: IndividualTable, report: RunReport) -> Self {
        Self {
            base,
            families: FamilyTable::new(),
            report,
        }
    }

    /// Base rows not yet assigned, in input order
    pub fn unassigned(&self) -> impl Iterator<Item = &Individual> {
        self.base.unassigned(&self.families)
    }

    /// Number of base rows not yet assigned
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.unassigned().count()
    }

    /// Add assignments for unclaimed individuals
    pub fn append(&mut self, stage: &str, assignments: Vec<FamilyAssignment>) -> Result<InsertOutcome> {
        let matched = rule_counts(&assignments);
        let outcome = self.families.append(assignments);
        self.finish(stage, &matched, outcome)
    }

    /// Evict `removals` from their current families, then insert `assignments`
    pub fn promote(
        &mut self,
        stage: &str,
        removals: &FxHashSet<i64>,
        assignments: Vec<FamilyAssignment>,
    ) -> Result<InsertOutcome> {
        let matched = rule_counts(&assignments);
        let outcome = self.families.promote(removals, assignments);
        if outcome.evicted > 0 {
            log::debug!("{stage}: {} prior assignments evicted", outcome.evicted);
        }
        self.finish(stage, &matched, outcome)
    }

    /// Insert assignments that override any existing row of the same id
    pub fn merge_last_wins(
        &mut self,
        stage: &str,
        assignments: Vec<FamilyAssignment>,
    ) -> Result<InsertOutcome> {
        let matched = rule_counts(&assignments);
        let outcome = self.families.merge_last_wins(assignments);
        log_anomaly(
            &format!("assignments replaced by {stage}"),
            outcome.evicted,
        );
        self.finish(stage, &matched, outcome)
    }

    /// Record anchors that could not be found in the base table
    pub fn record_unresolved(&mut self, stage: &str, count: usize) {
        self.report.unresolved_anchors += count;
        log_anomaly(&format!("rows without a resolvable anchor in {stage}"), count);
    }

    fn finish(
        &mut self,
        stage: &str,
        matched: &BTreeMap<Rule, usize>,
        outcome: InsertOutcome,
    ) -> Result<InsertOutcome> {
        if matched.is_empty() {
            log::info!("{stage}: no rows matched");
        }
        for (rule, count) in matched {
            log_rule_applied(*rule, *count, self.families.len(), self.base.len());
        }
        self.report.duplicate_assignments += outcome.duplicates;
        log_anomaly(&format!("duplicate individuals dropped in {stage}"), outcome.duplicates);
        self.families.check_against(&self.base, stage)?;
        Ok(outcome)
    }
}

fn rule_counts(assignments: &[FamilyAssignment]) -> BTreeMap<Rule, usize> {
    let mut counts = BTreeMap::new();
    for assignment in assignments {
        *counts.entry(assignment.rule).or_insert(0) += 1;
    }
    counts
}
