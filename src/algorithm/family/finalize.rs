//! Family finalization
//!
//! Turns the assignment table into the persisted relation: flags heads, ranks
//! children within each family, derives role codes and drops repeated
//! (family, role) pairs.

use itertools::Itertools;
use rustc_hash::FxHashSet;

use super::statistics::RunReport;
use crate::models::family::{
    FIRST_CHILD_ROLE, FamilyAssignment, FamilyMember, FamilyRecord, HEAD_ROLE, SPOUSE_ROLE,
};
use crate::utils::logging::log_anomaly;

/// Members and output rows of a finalized family table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizedFamilies {
    /// Members kept in the output, in assignment order
    pub members: Vec<FamilyMember>,
    /// Output rows, parallel to `members`
    pub records: Vec<FamilyRecord>,
}

/// Rank children within their family
///
/// Children start at rank 1, everyone else at 0. While a (family, rank) pair
/// repeats, every occurrence after the first is moved up by one. Each pass
/// reads the ranks left by the previous pass.
#[must_use]
pub fn rank_children(assignments: &[FamilyAssignment]) -> Vec<u32> {
    let mut ranks: Vec<u32> = assignments.iter().map(|row| u32::from(row.is_child)).collect();
    loop {
        let mut seen = FxHashSet::default();
        let repeated: Vec<usize> = assignments
            .iter()
            .zip(&ranks)
            .enumerate()
            .filter(|(_, (_, rank))| **rank > 0)
            .filter(|(_, (row, rank))| !seen.insert((row.family_id, **rank)))
            .map(|(position, _)| position)
            .collect();
        if repeated.is_empty() {
            return ranks;
        }
        for position in repeated {
            ranks[position] += 1;
        }
    }
}

/// Role code of a member: 0 for the head, 1 for other adults, rank + 1 for
/// children
#[must_use]
pub fn role_code(is_head: bool, is_child: bool, rank: u32) -> i32 {
    if is_head {
        HEAD_ROLE
    } else if is_child {
        i32::try_from(rank).map_or(i32::MAX, |rank| rank + FIRST_CHILD_ROLE - 1)
    } else {
        SPOUSE_ROLE
    }
}

/// Finalize the assignment table
pub fn finalize(assignments: &[FamilyAssignment], report: &mut RunReport) -> FinalizedFamilies {
    let ranks = rank_children(assignments);
    let members: Vec<FamilyMember> = assignments
        .iter()
        .zip(ranks)
        .map(|(row, rank)| {
            let is_head = row.is_self_anchored();
            FamilyMember {
                individual_id: row.individual_id,
                family_id: row.family_id,
                rule: row.rule,
                is_child: row.is_child,
                is_head,
                rank,
                role_code: role_code(is_head, row.is_child, rank),
            }
        })
        .collect();

    report.family_count = members.iter().map(|m| m.family_id).unique().count();
    report.families_without_single_head = members
        .iter()
        .into_group_map_by(|m| m.family_id)
        .values()
        .filter(|group| group.iter().filter(|m| m.is_head).count() != 1)
        .count();
    log_anomaly(
        "families without exactly one head",
        report.families_without_single_head,
    );

    let before = members.len();
    let members: Vec<FamilyMember> = members
        .into_iter()
        .unique_by(|m| (m.family_id, m.role_code))
        .collect();
    report.role_collisions = before - members.len();
    log_anomaly("rows dropped for a repeated family role", report.role_collisions);

    let records = members.iter().map(FamilyMember::to_record).collect();
    FinalizedFamilies { members, records }
}
