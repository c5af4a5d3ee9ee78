//! Subject → encounter window index.
//!
//! Each subject keeps its encounters in cohort-definition order. A lookup
//! returns the first encounter in that order whose window contains the
//! timestamp. Overlapping and out-of-order windows are kept as given; the
//! list order alone breaks ties.

use chrono::{Duration, NaiveDateTime};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use stayframe_core::errors::ExtractError;
use stayframe_core::CohortRecord;

/// One encounter's inclusive observation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterWindow {
    pub stay_id: String,
    pub admission: NaiveDateTime,
    pub close: NaiveDateTime,
}

impl EncounterWindow {
    pub fn new(stay_id: impl Into<String>, admission: NaiveDateTime, window: Duration) -> Self {
        Self {
            stay_id: stay_id.into(),
            admission,
            close: admission
                .checked_add_signed(window)
                .unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// `admission <= ts <= admission + window`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.admission <= ts && ts <= self.close
    }
}

/// Counts from [`CohortIndex::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBuildStats {
    pub records: usize,
    pub indexed: usize,
    /// Encounters excluded because their admission time was unusable.
    pub unparseable_admission: usize,
    pub subjects: usize,
}

/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct CohortIndex {
    by_subject: FxHashMap<String, SmallVec<[EncounterWindow; 2]>>,
    window: Duration,
    stats: IndexBuildStats,
}

impl CohortIndex {
    /// Group records by subject, preserving input order within each subject.
    ///
    /// Records without an admission time are excluded and counted. Fails
    /// with `EmptyCohort` when nothing usable remains.
    pub fn build(records: &[CohortRecord], window: Duration) -> Result<Self, ExtractError> {
        let mut by_subject: FxHashMap<String, SmallVec<[EncounterWindow; 2]>> =
            FxHashMap::default();
        let mut stats = IndexBuildStats {
            records: records.len(),
            ..Default::default()
        };

        for record in records {
            let Some(admission) = record.admission else {
                stats.unparseable_admission += 1;
                tracing::debug!(
                    subject_id = %record.subject_id,
                    stay_id = %record.stay_id,
                    "excluding encounter without admission time"
                );
                continue;
            };
            by_subject
                .entry(record.subject_id.clone())
                .or_default()
                .push(EncounterWindow::new(record.stay_id.clone(), admission, window));
            stats.indexed += 1;
        }

        if stats.indexed == 0 {
            return Err(ExtractError::EmptyCohort {
                excluded: stats.unparseable_admission,
            });
        }
        stats.subjects = by_subject.len();

        tracing::info!(
            encounters = stats.indexed,
            subjects = stats.subjects,
            excluded = stats.unparseable_admission,
            window_hours = window.num_hours(),
            "built cohort index"
        );

        Ok(Self {
            by_subject,
            window,
            stats,
        })
    }

    /// First encounter, in stored order, whose window contains `ts`.
    pub fn lookup(&self, subject_id: &str, ts: NaiveDateTime) -> Option<&str> {
        self.by_subject
            .get(subject_id)?
            .iter()
            .find(|w| w.contains(ts))
            .map(|w| w.stay_id.as_str())
    }

    pub fn contains_subject(&self, subject_id: &str) -> bool {
        self.by_subject.contains_key(subject_id)
    }

    pub fn encounters_for(&self, subject_id: &str) -> &[EncounterWindow] {
        self.by_subject
            .get(subject_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every indexed stay id.
    pub fn stay_ids(&self) -> FxHashSet<String> {
        self.by_subject
            .values()
            .flatten()
            .map(|w| w.stay_id.clone())
            .collect()
    }

    pub fn subject_count(&self) -> usize {
        self.by_subject.len()
    }

    pub fn encounter_count(&self) -> usize {
        self.stats.indexed
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn build_stats(&self) -> &IndexBuildStats {
        &self.stats
    }
}
