use std::collections::{BTreeMap, BTreeSet};

use famc_builder::store::TableStore;
use famc_builder::{FamilyConfig, FamilyPipeline, IndividualRecord};

use crate::utils::{TEST_YEAR, build, person, scenario_households, store_with, tax_only};

/// Several households exercising most rules, plus two tax-only individuals no
/// rule can place
fn mixed_population() -> (Vec<IndividualRecord>, Vec<IndividualRecord>) {
    let mut main = scenario_households();

    let mut child = person(3, 4, 4, 5, 1);
    child.mother_index = Some(3);
    main.extend([
        person(3, 1, 1, 70, 1),
        person(3, 3, 4, 35, 2),
        child,
        person(3, 5, 4, 6, 2),
    ]);

    let mut father = person(4, 3, 4, 40, 1);
    father.partner_index = Some(4);
    let mut teenager = person(4, 5, 4, 17, 2);
    teenager.father_index = Some(3);
    main.extend([person(4, 1, 1, 72, 2), father, person(4, 4, 4, 38, 2), teenager]);

    let mut stray = person(8, 7, 4, 10, 1);
    stray.source_file_kind = Some("FIP".to_string());
    main.extend([person(8, 1, 1, 50, 1), stray]);

    let secondary = vec![tax_only(8, 5, 19, 1), tax_only(8, 8, 40, 1)];
    (main, secondary)
}

#[test]
fn test_survey_individuals_covered_exactly_once() {
    let (main, secondary) = mixed_population();
    let outcome = build(&main, &[], &secondary);

    let output: Vec<i64> = outcome.records.iter().map(|r| r.individual_id).collect();
    let unique: BTreeSet<i64> = output.iter().copied().collect();
    assert_eq!(output.len(), unique.len());

    let mut expected: BTreeSet<i64> = main
        .iter()
        .filter(|r| r.source_file_kind.as_deref() == Some("EE"))
        .map(IndividualRecord::derived_id)
        .collect();
    expected.insert(805);
    assert_eq!(unique, expected);
    assert_eq!(outcome.report.role_collisions, 0);
}

#[test]
fn test_unplaced_tax_only_rows_are_reported() {
    let (main, secondary) = mixed_population();
    let outcome = build(&main, &[], &secondary);

    // Tax-only rows matching no rule stay outside every family
    assert_eq!(outcome.report.unplaced_secondary, vec![807, 808]);
    assert!(
        outcome
            .records
            .iter()
            .all(|r| r.individual_id != 807 && r.individual_id != 808)
    );
    assert_eq!(outcome.report.secondary_rows, 2);
    assert_eq!(outcome.report.secondary_admitted, 1);
}

#[test]
fn test_families_anchor_within_household() {
    let (main, secondary) = mixed_population();
    let outcome = build(&main, &[], &secondary);

    let members: BTreeSet<i64> = outcome.records.iter().map(|r| r.individual_id).collect();
    for record in &outcome.records {
        assert_eq!(record.family_id / 100, record.individual_id / 100);
        assert!(members.contains(&record.family_id));
    }
}

#[test]
fn test_every_family_has_one_head() {
    let (main, secondary) = mixed_population();
    let outcome = build(&main, &[], &secondary);

    let mut heads: BTreeMap<i64, usize> = BTreeMap::new();
    for record in &outcome.records {
        let count = heads.entry(record.family_id).or_default();
        if record.role_code == 0 {
            *count += 1;
        }
    }
    assert!(heads.values().all(|&count| count == 1));
    assert_eq!(outcome.report.families_without_single_head, 0);
    assert_eq!(outcome.report.family_count, heads.len());
}

#[test]
fn test_child_ranks_unique_within_family() {
    let mut main = scenario_households();
    main.extend([person(1, 4, 3, 6, 2), person(1, 5, 3, 3, 1)]);
    let outcome = build(&main, &[], &[]);

    let pairs: BTreeSet<(i64, i32)> = outcome
        .records
        .iter()
        .map(|r| (r.family_id, r.role_code))
        .collect();
    assert_eq!(pairs.len(), outcome.records.len());

    let mut ranks: Vec<u32> = outcome
        .members
        .iter()
        .filter(|m| m.family_id == 101 && m.is_child)
        .map(|m| m.rank)
        .collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_runs_are_deterministic() {
    let (main, secondary) = mixed_population();
    let config = FamilyConfig::default();

    let mut first = store_with(&main, &[], &secondary);
    let mut second = store_with(&main, &[], &secondary);
    let first_report = FamilyPipeline::new(&config).run(&mut first, TEST_YEAR).unwrap();
    let second_report = FamilyPipeline::new(&config).run(&mut second, TEST_YEAR).unwrap();

    assert_eq!(first_report, second_report);
    assert_eq!(
        first.get(&config.tables.families, TEST_YEAR).unwrap(),
        second.get(&config.tables.families, TEST_YEAR).unwrap()
    );
}
