//! Property tests for window containment and first-match resolution.

use std::fmt::Write as _;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rustc_hash::FxHashMap;
use stayframe_core::config::{CodeSet, VariableSpec};
use stayframe_core::CohortRecord;
use stayframe_extract::{eligible_stays, CohortIndex, StreamingWindowedExtractor};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2150, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

proptest! {
    #[test]
    fn lookup_matches_iff_inside_window(
        admit_min in 0i64..10_000,
        offset_min in -3_000i64..3_000,
        window_h in 1i64..72,
    ) {
        let admission = base() + Duration::minutes(admit_min);
        let records = vec![CohortRecord::new("1", "h", "S", Some(admission))];
        let index = CohortIndex::build(&records, Duration::hours(window_h)).unwrap();

        let ts = admission + Duration::minutes(offset_min);
        let inside = offset_min >= 0 && offset_min <= window_h * 60;
        prop_assert_eq!(index.lookup("1", ts).is_some(), inside);
    }

    #[test]
    fn lookup_returns_first_containing_encounter_in_list_order(
        admits in prop::collection::vec(0i64..200, 1..8),
        at_hour in 0i64..260,
    ) {
        let window = Duration::hours(24);
        let records: Vec<CohortRecord> = admits
            .iter()
            .enumerate()
            .map(|(i, h)| CohortRecord::new("1", format!("h{i}"), format!("S{i}"), Some(base() + Duration::hours(*h))))
            .collect();
        let index = CohortIndex::build(&records, window).unwrap();

        let ts = base() + Duration::hours(at_hour);
        let expected = admits
            .iter()
            .position(|h| *h <= at_hour && at_hour <= h + 24)
            .map(|i| format!("S{i}"));
        prop_assert_eq!(index.lookup("1", ts).map(str::to_string), expected);
    }
}

/// One encounter per `(subject, admit_hour)` pair, stay ids in list order.
fn encounters(admits: &[(u8, i64)]) -> Vec<CohortRecord> {
    admits
        .iter()
        .enumerate()
        .map(|(i, (subject, hour))| {
            CohortRecord::new(
                subject.to_string(),
                format!("h{i}"),
                format!("S{i}"),
                Some(base() + Duration::hours(*hour)),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn extracted_rows_fall_inside_their_stay_window(
        admits in prop::collection::vec((1u8..4, 0i64..240), 1..8),
        events in prop::collection::vec((1u8..5, -2_000i64..20_000), 0..60),
        window_h in 1i64..48,
        batch_size in 1usize..16,
    ) {
        let window = Duration::hours(window_h);
        let records = encounters(&admits);
        let index = CohortIndex::build(&records, window).unwrap();
        let eligible = eligible_stays(&records);
        let admission: FxHashMap<&str, NaiveDateTime> = records
            .iter()
            .filter_map(|r| Some((r.stay_id.as_str(), r.admission?)))
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labevents.csv");
        let mut body = String::from("subject_id,itemid,valuenum,charttime\n");
        for (i, (subject, minute)) in events.iter().enumerate() {
            let ts = base() + Duration::minutes(*minute);
            writeln!(body, "{subject},51265,{i},{}", ts.format("%Y-%m-%d %H:%M:%S")).unwrap();
        }
        std::fs::write(&path, body).unwrap();

        let variables = vec![VariableSpec::new("platelet", CodeSet::One(51265))];
        let extractor = StreamingWindowedExtractor::new(&index, &eligible, batch_size);
        let output = extractor.extract(&path, "charttime", &variables).unwrap();

        let rows = &output.table("platelet").unwrap().rows;
        prop_assert_eq!(rows.len() as u64 + output.stats.discarded(), events.len() as u64);
        for row in rows {
            let admitted = admission[row.stay_id.as_str()];
            prop_assert!(admitted <= row.charttime);
            prop_assert!(row.charttime <= admitted + window);
        }
    }
}
