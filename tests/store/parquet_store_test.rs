use famc_builder::error::FamilyError;
use famc_builder::models::FamilyRecord;
use famc_builder::store::TableStore;
use famc_builder::{FamilyConfig, FamilyPipeline, IndividualRecord, ParquetStore};

use crate::utils::{TEST_YEAR, record_of, scenario_households};

fn seeded_store(dir: &std::path::Path) -> ParquetStore {
    let tables = FamilyConfig::default().tables;
    let mut store = ParquetStore::open(dir).unwrap();
    store
        .put(
            &tables.individuals,
            TEST_YEAR,
            IndividualRecord::to_record_batch(&scenario_households()).unwrap(),
        )
        .unwrap();
    for name in [&tables.future_children, &tables.secondary] {
        store
            .put(name, TEST_YEAR, IndividualRecord::to_record_batch(&[]).unwrap())
            .unwrap();
    }
    store
}

#[test]
fn test_table_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(dir.path());

    assert!(store.table_path("indivim", TEST_YEAR).ends_with("indivim_2006.parquet"));
    assert!(store.contains("indivim", TEST_YEAR));
    assert!(!store.contains("indivim", 2007));

    let batch = store.get("indivim", TEST_YEAR).unwrap();
    let records = IndividualRecord::from_record_batch(&batch).unwrap();
    assert_eq!(records, scenario_households());
}

#[test]
fn test_pipeline_on_parquet_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path());
    let config = FamilyConfig::default();

    let report = FamilyPipeline::new(&config).run(&mut store, TEST_YEAR).unwrap();
    assert_eq!(report.output_rows, 4);

    let reopened = ParquetStore::open(dir.path()).unwrap();
    let batch = reopened.get(&config.tables.families, TEST_YEAR).unwrap();
    let records = FamilyRecord::from_record_batch(&batch).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(record_of(&records, 102).family_id, 101);
    assert_eq!(record_of(&records, 201).role_code, 0);
}

#[test]
fn test_missing_table_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = ParquetStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.get("fipDat", TEST_YEAR),
        Err(FamilyError::MissingTable { .. })
    ));

    assert!(matches!(
        ParquetStore::open(dir.path().join("absent")),
        Err(FamilyError::Config(_))
    ));
}
