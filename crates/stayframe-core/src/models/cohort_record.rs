use chrono::NaiveDateTime;

/// One encounter in the cohort definition.
///
/// `admission` is `None` when the admission time was missing or
/// unparseable; such records still seed the WideTable key space but are
/// never indexed, so they receive no events.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRecord {
    pub subject_id: String,
    pub hadm_id: String,
    pub stay_id: String,
    pub admission: Option<NaiveDateTime>,
}

impl CohortRecord {
    pub fn new(
        subject_id: impl Into<String>,
        hadm_id: impl Into<String>,
        stay_id: impl Into<String>,
        admission: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            hadm_id: hadm_id.into(),
            stay_id: stay_id.into(),
            admission,
        }
    }
}
