//! Accumulating family assignments
//!
//! `FamilyTable` owns the authoritative set of claimed individual ids. Rules
//! only ever add rows for unclaimed individuals, except through `promote`,
//! which evicts a known set of ids before inserting their replacements.
//!
//! A family is named after its anchor. When a later rule moves that anchor
//! into another family, the members left behind follow it: family ids are
//! resolved through the anchor's current row whenever rows are read.

use std::collections::hash_map::Entry;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::collections::individual::IndividualTable;
use crate::error::{Result, ensure};
use crate::models::family::FamilyAssignment;

/// Outcome of inserting a batch of assignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows added to the table
    pub inserted: usize,
    /// Existing rows removed first
    pub evicted: usize,
    /// Rows dropped as duplicates, within the batch or of a claimed id
    pub duplicates: usize,
}

/// Result table of the rule cascade
#[derive(Debug, Default, Clone)]
pub struct FamilyTable {
    /// Assignments in insertion order
    rows: Vec<FamilyAssignment>,
    /// Ids present in `rows`, with the family id their row was given
    claimed: FxHashMap<i64, i64>,
}

impl FamilyTable {
    /// Create a new empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether an individual already belongs to a family
    #[must_use]
    pub fn is_claimed(&self, individual_id: i64) -> bool {
        self.claimed.contains_key(&individual_id)
    }

    /// Assignment of an individual, if any, with its family id resolved
    #[must_use]
    pub fn get(&self, individual_id: i64) -> Option<FamilyAssignment> {
        if !self.is_claimed(individual_id) {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.individual_id == individual_id)
            .map(|row| self.resolved(row))
    }

    /// Family a row anchored on `family_id` belongs to now
    ///
    /// Follows the anchor's own row while the anchor sits in a family other
    /// than its own. Stops at a self-anchored or unassigned anchor, and on a
    /// cycle back to the starting id.
    #[must_use]
    pub fn resolve_family(&self, family_id: i64) -> i64 {
        let mut current = family_id;
        for _ in 0..self.claimed.len() {
            match self.claimed.get(&current) {
                Some(&next) if next != current && next != family_id => current = next,
                _ => break,
            }
        }
        current
    }

    /// Number of rows whose family followed a relocated anchor
    #[must_use]
    pub fn relocated_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| self.resolve_family(row.family_id) != row.family_id)
            .count()
    }

    /// Consume the table into its rows, family ids resolved
    #[must_use]
    pub fn into_rows(self) -> Vec<FamilyAssignment> {
        self.rows.iter().map(|row| self.resolved(row)).collect()
    }

    /// Number of distinct resolved family ids
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| self.resolve_family(row.family_id))
            .collect::<FxHashSet<_>>()
            .len()
    }

    fn resolved(&self, row: &FamilyAssignment) -> FamilyAssignment {
        FamilyAssignment {
            family_id: self.resolve_family(row.family_id),
            ..row.clone()
        }
    }

    /// Add assignments for unclaimed individuals
    ///
    /// The first assignment of an id wins: rows for already claimed ids, and
    /// repeats within the batch, are dropped and counted.
    pub fn append(&mut self, assignments: Vec<FamilyAssignment>) -> InsertOutcome {
        let mut outcome = InsertOutcome::default();
        for assignment in assignments {
            if let Entry::Vacant(entry) = self.claimed.entry(assignment.individual_id) {
                entry.insert(assignment.family_id);
                self.rows.push(assignment);
                outcome.inserted += 1;
            } else {
                outcome.duplicates += 1;
            }
        }
        outcome
    }

    /// Evict `removals`, then insert `assignments`
    ///
    /// The two phases never interleave. Within `assignments` the last row of a
    /// repeated id wins, so callers list authoritative rows last. Rows for ids
    /// still claimed after the eviction are dropped.
    pub fn promote(
        &mut self,
        removals: &FxHashSet<i64>,
        assignments: Vec<FamilyAssignment>,
    ) -> InsertOutcome {
        let before = self.rows.len();
        self.rows.retain(|row| !removals.contains(&row.individual_id));
        for id in removals {
            self.claimed.remove(id);
        }
        let evicted = before - self.rows.len();

        let (assignments, repeated) = keep_last(assignments);
        let mut outcome = self.append(assignments);
        outcome.evicted = evicted;
        outcome.duplicates += repeated;
        outcome
    }

    /// Merge assignments that override any existing row for the same id
    pub fn merge_last_wins(&mut self, assignments: Vec<FamilyAssignment>) -> InsertOutcome {
        let removals: FxHashSet<i64> = assignments.iter().map(|row| row.individual_id).collect();
        self.promote(&removals, assignments)
    }

    /// Check the table against the base table it was built from
    ///
    /// # Errors
    /// Returns an invariant violation when the table holds more rows than the
    /// base, an id the base does not contain, or claimed ids out of step with
    /// its rows.
    pub fn check_against(&self, base: &IndividualTable, stage: &str) -> Result<()> {
        ensure(self.rows.len() <= base.len(), || {
            format!(
                "{stage}: {} family rows for {} individuals",
                self.rows.len(),
                base.len()
            )
        })?;
        ensure(self.claimed.len() == self.rows.len(), || {
            format!(
                "{stage}: {} claimed ids for {} rows",
                self.claimed.len(),
                self.rows.len()
            )
        })?;
        if let Some(stray) = self.rows.iter().find(|row| !base.contains(row.individual_id)) {
            return Err(crate::error::FamilyError::invariant(format!(
                "{stage}: individual {} assigned but absent from the base table",
                stray.individual_id
            )));
        }
        log::debug!(
            "{stage}: {} rows in families vs {} rows in base, {} distinct families",
            self.rows.len(),
            base.len(),
            self.family_count()
        );
        Ok(())
    }
}

/// Drop all but the last occurrence of each id, keeping row order
fn keep_last(assignments: Vec<FamilyAssignment>) -> (Vec<FamilyAssignment>, usize) {
    let total = assignments.len();
    let mut seen = FxHashSet::default();
    let mut kept: Vec<FamilyAssignment> = assignments
        .into_iter()
        .rev()
        .filter(|row| seen.insert(row.individual_id))
        .collect();
    kept.reverse();
    let dropped = total - kept.len();
    (kept, dropped)
}
