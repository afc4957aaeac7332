//! Run statistics and summaries
//!
//! Every data-quality anomaly the cascade resolves on its own is counted here
//! so that a run can be audited without reading the log.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::family::FamilyAssignment;

/// Counters collected during one per-year run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Survey year
    pub year: i32,
    /// Rows in the main individual table
    pub main_rows: usize,
    /// Main-table children placed outside the household, excluded from the base
    pub excluded_placed_children: usize,
    /// Stored individual ids that disagree with the household and person keys
    pub mismatched_ids: usize,
    /// Future children added to the base
    pub future_children_admitted: usize,
    /// Tax-only rows with a usable household role
    pub secondary_rows: usize,
    /// Tax-only rows skipped for a missing or invalid household role
    pub skipped_secondary: usize,
    /// Tax-only individuals folded into the base
    pub secondary_admitted: usize,
    /// Rows of the base table at the end of the run
    pub base_rows: usize,
    /// Final assignments by rule code
    pub assigned_by_rule: BTreeMap<i32, usize>,
    /// Rows dropped because their individual was already assigned
    pub duplicate_assignments: usize,
    /// Rows whose anchor (parent, partner, declarant) is not in the base
    pub unresolved_anchors: usize,
    /// Individuals skipped because their household has no reference person
    pub households_without_reference: usize,
    /// Tax-only individuals that no rule placed in a family
    pub unplaced_secondary: Vec<i64>,
    /// Distinct families in the output
    pub family_count: usize,
    /// Rows that followed their anchor into the anchor's new family
    pub relocated_members: usize,
    /// Families without exactly one head
    pub families_without_single_head: usize,
    /// Rows dropped because their (family, role) pair repeated
    pub role_collisions: usize,
    /// Rows in the persisted family table
    pub output_rows: usize,
}

impl RunReport {
    /// Create an empty report for a year
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }

    /// Count final assignments by the rule that produced them
    pub fn record_rules(&mut self, assignments: &[FamilyAssignment]) {
        self.assigned_by_rule.clear();
        for assignment in assignments {
            *self.assigned_by_rule.entry(assignment.rule.code()).or_insert(0) += 1;
        }
    }

    /// Total number of anomalies resolved without failing the run
    #[must_use]
    pub fn anomaly_count(&self) -> usize {
        self.duplicate_assignments
            + self.unresolved_anchors
            + self.households_without_reference
            + self.skipped_secondary
            + self.unplaced_secondary.len()
            + self.families_without_single_head
            + self.role_collisions
    }

    /// Generate a human readable summary
    #[must_use]
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("Family Table Summary ({}):\n", self.year));
        summary.push_str(&format!("  Main Individuals: {}\n", self.main_rows));
        summary.push_str(&format!(
            "  Excluded Placed Children: {}\n",
            self.excluded_placed_children
        ));
        summary.push_str(&format!(
            "  Future Children Admitted: {}\n",
            self.future_children_admitted
        ));
        summary.push_str(&format!(
            "  Tax-Only Individuals Admitted: {} of {}\n",
            self.secondary_admitted, self.secondary_rows
        ));
        summary.push_str(&format!("  Base Individuals: {}\n", self.base_rows));
        summary.push_str(&format!("  Families: {}\n", self.family_count));
        summary.push_str(&format!(
            "  Members Following a Moved Anchor: {}\n",
            self.relocated_members
        ));
        summary.push_str(&format!("  Output Rows: {}\n", self.output_rows));

        summary.push_str("\nAssignments by Rule:\n");
        for (rule, count) in &self.assigned_by_rule {
            let percentage = if self.base_rows > 0 {
                (*count as f64 / self.base_rows as f64) * 100.0
            } else {
                0.0
            };
            summary.push_str(&format!("  {rule}: {count} ({percentage:.1}%)\n"));
        }

        if self.anomaly_count() > 0 {
            summary.push_str("\nData Quality:\n");
            summary.push_str(&format!(
                "  Duplicate Assignments: {}\n",
                self.duplicate_assignments
            ));
            summary.push_str(&format!("  Unresolved Anchors: {}\n", self.unresolved_anchors));
            summary.push_str(&format!(
                "  Without Reference Person: {}\n",
                self.households_without_reference
            ));
            summary.push_str(&format!(
                "  Skipped Tax-Only Rows: {}\n",
                self.skipped_secondary
            ));
            summary.push_str(&format!(
                "  Unplaced Tax-Only Individuals: {}\n",
                self.unplaced_secondary.len()
            ));
            summary.push_str(&format!(
                "  Families Without Single Head: {}\n",
                self.families_without_single_head
            ));
            summary.push_str(&format!("  Role Collisions: {}\n", self.role_collisions));
        }

        summary
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary())
    }
}
