use std::collections::HashMap;

use crate::model::dnf_record::DnfRecord;
use crate::model::progress_row::ProgressRow;
use crate::model::timing_result::TimingResult;

/// Riders with telemetry but no finishing time, in progress-rank order.
pub fn derive_dnfs(event_subgroup_id: &str, results: &[TimingResult], progress: &[ProgressRow]) -> Vec<DnfRecord> {
    let finishers: HashMap<i64, &TimingResult> = results.iter().map(|r| (r.rider_id, r)).collect();
    progress
        .iter()
        .filter(|p| !finishers.contains_key(&p.rider_id))
        .map(|p| DnfRecord::from_progress(event_subgroup_id, p))
        .collect()
}
