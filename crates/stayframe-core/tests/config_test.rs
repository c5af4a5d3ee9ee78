//! Config loading tests.
//!
//! Each test targets a failure mode seen when run configs are edited by hand:
//! partial files, single-vs-list item codes, and broken files on disk.

use stayframe_core::config::{CodeSet, StayframeConfig};
use stayframe_core::errors::{ConfigError, StayframeErrorCode};

// ═══════════════════════════════════════════════════════════════════════════
// Partial files fall back to defaults
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn empty_toml_is_the_default_config() {
    let config = StayframeConfig::from_toml("").unwrap();
    assert_eq!(config, StayframeConfig::default());
}

#[test]
fn partial_processing_section_keeps_other_defaults() {
    let config = StayframeConfig::from_toml(
        r#"
        [processing]
        window_hours = 48
        "#,
    )
    .unwrap();
    assert_eq!(config.processing.window_hours, 48);
    assert_eq!(config.processing.batch_size, 100_000, "missing field should default");
    assert_eq!(config.sources.len(), 2, "default sources should survive");
}

// ═══════════════════════════════════════════════════════════════════════════
// Item codes: one or many
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn codes_accept_scalar_and_list_forms() {
    let config = StayframeConfig::from_toml(
        r#"
        [[sources]]
        name = "chart"
        path = "chartevents.csv"
        variables = [
            { name = "map", codes = 220052 },
            { name = "fio2", codes = [223835, 3420] },
            { name = "unused", codes = [] },
        ]
        "#,
    )
    .unwrap();

    assert_eq!(config.sources.len(), 1, "explicit sources replace the defaults");
    let source = &config.sources[0];
    assert_eq!(source.time_column, "charttime");
    assert_eq!(source.variables[0].codes, CodeSet::One(220052));
    assert_eq!(source.variables[1].codes.as_slice(), &[223835, 3420]);
    assert!(source.variables[2].codes.is_empty(), "empty code set is legal");
    config.validate().unwrap();
}

#[test]
fn explicit_merge_plan_overrides_derived_order() {
    let config = StayframeConfig::from_toml(
        r#"
        [[merge]]
        artifact = "chart_fio2.csv"
        column = "fio2"

        [[merge]]
        artifact = "vaso_scores.csv"
        column = "sofa_cardio"
        "#,
    )
    .unwrap();
    let plan = config.merge_plan();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[1].column, "sofa_cardio");
}

#[test]
fn duplicate_merge_columns_are_rejected() {
    let config = StayframeConfig::from_toml(
        r#"
        [[merge]]
        artifact = "lab_platelet.csv"
        column = "platelet"

        [[merge]]
        artifact = "lab_platelet_v2.csv"
        column = "platelet"
        "#,
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateName { kind: "merge column", .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// Loading from disk
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn load_reports_missing_file_as_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StayframeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert_eq!(err.error_code(), "IO_ERROR");
}

#[test]
fn load_reports_malformed_toml_as_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.toml");
    std::fs::write(&path, "[processing\nbatch_size = ").unwrap();
    let err = StayframeConfig::load(&path).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");
}

#[test]
fn missing_paths_lists_absent_inputs_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cohort_definition.csv"), "subject_id\n").unwrap();

    let mut config = StayframeConfig::default();
    config.paths.base_dir = dir.path().to_path_buf();
    config.paths.stays = None;

    let missing = config.missing_paths();
    assert_eq!(missing.len(), 2, "both default event sources are absent");
    assert!(missing.iter().all(|p| p.starts_with(dir.path())));
    assert!(!missing.contains(&dir.path().join("cohort_definition.csv")));
}

#[test]
fn stays_table_is_not_required_when_cohort_has_intime() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cohort_definition.csv"),
        "subject_id, hadm_id, stay_id, intime\n",
    )
    .unwrap();

    let mut config = StayframeConfig::default();
    config.paths.base_dir = dir.path().to_path_buf();
    config.sources.clear();

    assert!(config.missing_paths().is_empty());
}

#[test]
fn stays_table_is_required_when_cohort_lacks_intime() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cohort_definition.csv"),
        "subject_id,hadm_id,stay_id\n",
    )
    .unwrap();

    let mut config = StayframeConfig::default();
    config.paths.base_dir = dir.path().to_path_buf();
    config.sources.clear();

    assert_eq!(config.missing_paths(), vec![dir.path().join("icustays.csv")]);
}

#[test]
fn create_directories_makes_temp_and_output_parents() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StayframeConfig::default();
    config.paths.base_dir = dir.path().to_path_buf();
    config.paths.output = "out/final/wide.csv".into();

    config.create_directories().unwrap();
    assert!(dir.path().join("temp_merge_files").is_dir());
    assert!(dir.path().join("out/final").is_dir());
}
