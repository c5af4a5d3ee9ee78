//! Default MIMIC-IV item maps.

use super::source_config::{CodeSet, SourceConfig};

pub const LAB_SOURCE: &str = "lab";
pub const CHART_SOURCE: &str = "chart";

/// Laboratory variables from `labevents.csv`.
pub fn lab_source() -> SourceConfig {
    SourceConfig::new(LAB_SOURCE, "labevents.csv")
        .with_variable("platelet", CodeSet::One(51265))
        .with_variable("bilirubin", CodeSet::One(50885))
        .with_variable("creatinine", CodeSet::One(50912))
        .with_variable("pao2", CodeSet::One(50821))
}

/// Vitals and assessments from `chartevents.csv`.
pub fn chart_source() -> SourceConfig {
    SourceConfig::new(CHART_SOURCE, "chartevents.csv")
        .with_variable("gcs_motor", CodeSet::One(223901))
        .with_variable("gcs_verbal", CodeSet::One(223900))
        .with_variable("gcs_eye", CodeSet::One(220739))
        .with_variable("temperature", CodeSet::One(223761))
        .with_variable("map", CodeSet::One(220052))
        .with_variable("fio2", CodeSet::Many(vec![223835, 3420]))
}

pub fn default_sources() -> Vec<SourceConfig> {
    vec![lab_source(), chart_source()]
}
