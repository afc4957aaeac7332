use std::io::Write;

use famc_builder::FamilyConfig;
use famc_builder::error::FamilyError;

#[test]
fn test_config_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"minimum_wage": {{"2006": 1254.28, "2010": 1343.77}}, "tables": {{"families": "famc_test"}}}}"#
    )
    .unwrap();

    let config = FamilyConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.minimum_wage.years().collect::<Vec<_>>(), vec![2006, 2010]);
    assert_eq!(config.tables.families, "famc_test");
    assert_eq!(config.tables.individuals, "indivim");
    assert!((config.wage_floor(2010).unwrap() - 1343.77 * 12.0 * 0.55).abs() < 1e-6);
}

#[test]
fn test_invalid_share_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"wage_floor_share": -0.5}}"#).unwrap();

    let err = FamilyConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, FamilyError::Config(_)));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = FamilyConfig::from_json_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FamilyError::Config(_)));
}

#[test]
fn test_config_summary_lists_years() {
    let summary = FamilyConfig::default().to_string();
    assert!(summary.contains("Minimum Wage 2006: 1254"));
    assert!(summary.contains("Families Table: famc"));
}
