use std::collections::HashSet;

use race_results_lambda::dnf::derive_dnfs;
use race_results_lambda::model::dnf_record::DnfRecord;
use race_results_lambda::model::progress_row::ProgressRow;
use race_results_lambda::model::timing_result::TimingResult;

fn row(rider_id: i64, line_id: i64, meters: i64, msec: i64) -> ProgressRow {
    ProgressRow { rider_id, line_id, meters, msec }
}

#[test]
fn rider_without_finish_is_dnf() {
    let results = vec![TimingResult::new(1, 1000)];
    let progress = vec![row(1, 3, 5000, 900), row(2, 2, 4800, 950)];

    let dnfs = derive_dnfs("X", &results, &progress);

    assert_eq!(
        dnfs,
        vec![DnfRecord {
            id: 0,
            dnf: true,
            rider_id: 2,
            event_subgroup_id: "X".to_string(),
            last_line_crossed: 2,
            last_crossing_time: 950,
            distance_ridden: 4800,
        }]
    );
}

#[test]
fn dnf_serializes_with_camel_case_keys() {
    let dnfs = derive_dnfs("X", &[], &[row(2, 2, 4800, 950)]);

    let json = serde_json::to_value(&dnfs).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "id": 0,
            "dnf": true,
            "riderId": 2,
            "eventSubgroupId": "X",
            "lastLineCrossed": 2,
            "lastCrossingTime": 950,
            "distanceRidden": 4800
        }])
    );
}

#[test]
fn dnfs_follow_progress_order() {
    let progress = vec![row(9, 4, 9000, 10), row(3, 3, 6000, 20), row(5, 1, 1000, 30)];

    let dnfs = derive_dnfs("X", &[], &progress);

    let riders: Vec<i64> = dnfs.iter().map(|d| d.rider_id).collect();
    assert_eq!(riders, vec![9, 3, 5]);
}

#[test]
fn every_unfinished_rider_appears_once_and_no_finisher_does() {
    let results: Vec<TimingResult> = [2, 4, 6, 11].iter().map(|&id| TimingResult::new(id, id * 100)).collect();
    let progress: Vec<ProgressRow> = (1..=8).map(|id| row(id, 1, 10_000 - id * 1000, id)).collect();

    let dnfs = derive_dnfs("X", &results, &progress);

    let dnf_riders: Vec<i64> = dnfs.iter().map(|d| d.rider_id).collect();
    assert_eq!(dnf_riders, vec![1, 3, 5, 7, 8]);
    let unique: HashSet<i64> = dnf_riders.iter().copied().collect();
    assert_eq!(unique.len(), dnf_riders.len());
    assert!(results.iter().all(|r| !unique.contains(&r.rider_id)));
}

#[test]
fn deriving_twice_gives_identical_output() {
    let results = vec![TimingResult::new(1, 1000)];
    let progress = vec![row(1, 3, 5000, 900), row(2, 2, 4800, 950), row(3, 1, 100, 10)];

    assert_eq!(derive_dnfs("X", &results, &progress), derive_dnfs("X", &results, &progress));
}

#[test]
fn empty_inputs_give_no_dnfs() {
    assert!(derive_dnfs("X", &[], &[]).is_empty());
    assert!(derive_dnfs("X", &[TimingResult::new(1, 10)], &[]).is_empty());
}
