use famc_builder::error::FamilyError;
use famc_builder::models::{FamilyRecord, Rule};
use famc_builder::store::TableStore;
use famc_builder::{FamilyConfig, FamilyPipeline, MemoryStore};

use crate::utils::{TEST_YEAR, build, person, record_of, scenario_households, store_with};

#[test]
fn test_reference_household_forms_one_family() {
    let outcome = build(&scenario_households(), &[], &[]);

    assert_eq!(
        record_of(&outcome.records, 101),
        FamilyRecord {
            individual_id: 101,
            role_code: 0,
            family_id: 101
        }
    );
    assert_eq!(record_of(&outcome.records, 102).role_code, 1);
    assert_eq!(record_of(&outcome.records, 102).family_id, 101);
    assert_eq!(record_of(&outcome.records, 103).role_code, 2);
    assert_eq!(record_of(&outcome.records, 103).family_id, 101);

    let child = outcome
        .members
        .iter()
        .find(|m| m.individual_id == 103)
        .unwrap();
    assert_eq!(child.rank, 1);
    assert!(child.is_child);
    assert_eq!(child.rule, Rule::ReferencePerson);
}

#[test]
fn test_lone_reference_person_is_singleton_head() {
    let outcome = build(&scenario_households(), &[], &[]);

    let lone = record_of(&outcome.records, 201);
    assert_eq!(lone.family_id, 201);
    assert_eq!(lone.role_code, 0);
    assert_eq!(
        outcome.records.iter().filter(|r| r.family_id == 201).count(),
        1
    );
    assert_eq!(outcome.report.family_count, 2);
    assert_eq!(outcome.report.output_rows, 4);
}

#[test]
fn test_pipeline_writes_family_table() {
    let config = FamilyConfig::default();
    let mut store = store_with(&scenario_households(), &[], &[]);

    let report = FamilyPipeline::new(&config)
        .run(&mut store, TEST_YEAR)
        .unwrap();

    assert!(store.contains(&config.tables.families, TEST_YEAR));
    let batch = store.get(&config.tables.families, TEST_YEAR).unwrap();
    assert_eq!(batch.num_rows(), 4);
    assert_eq!(batch.schema().field(0).name(), "noindiv");
    assert_eq!(batch.schema().field(1).name(), "quifam");
    assert_eq!(batch.schema().field(2).name(), "idfam");

    let records = FamilyRecord::from_record_batch(&batch).unwrap();
    assert_eq!(record_of(&records, 103).role_code, 2);
    assert_eq!(report.assigned_by_rule.get(&10), Some(&4));
    assert_eq!(report.anomaly_count(), 0);
}

#[test]
fn test_unknown_year_fails_before_reading() {
    let config = FamilyConfig::default();
    let mut store = MemoryStore::new();

    let err = FamilyPipeline::new(&config).run(&mut store, 1990).unwrap_err();
    assert!(matches!(err, FamilyError::UnknownYear(1990)));
    assert!(store.is_empty());
}

#[test]
fn test_missing_table_is_reported() {
    let config = FamilyConfig::default();
    let mut store = MemoryStore::new();

    let err = FamilyPipeline::new(&config)
        .run(&mut store, TEST_YEAR)
        .unwrap_err();
    assert!(matches!(err, FamilyError::MissingTable { year: TEST_YEAR, .. }));
}

#[test]
fn test_placed_child_excluded_from_output() {
    let mut placed = person(3, 3, 3, 9, 2);
    placed.relationship_code = Some(6);
    let main = vec![person(3, 1, 1, 50, 2), placed];

    let outcome = build(&main, &[], &[]);
    assert_eq!(outcome.report.excluded_placed_children, 1);
    assert!(outcome.records.iter().all(|r| r.individual_id != 303));
}

#[test]
fn test_future_child_joins_reference_family() {
    let mut unborn = person(1, 4, 3, 0, 1);
    unborn.age_for_family = None;
    unborn.birth_year = Some(TEST_YEAR);
    unborn.birth_month = Some(3);

    let outcome = build(&scenario_households(), &[unborn], &[]);

    assert_eq!(outcome.report.future_children_admitted, 1);
    let unborn = record_of(&outcome.records, 104);
    assert_eq!(unborn.family_id, 101);
    assert_eq!(unborn.role_code, 3);
}
