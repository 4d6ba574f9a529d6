use serde::{Deserialize, Serialize};

use crate::model::progress_row::ProgressRow;

/// Placeholder result for a rider seen in telemetry who never finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnfRecord {
    /// No stored result backs a DNF, so the id is always 0.
    pub id: i64,
    pub dnf: bool,
    pub rider_id: i64,
    pub event_subgroup_id: String,
    pub last_line_crossed: i64,
    pub last_crossing_time: i64,
    pub distance_ridden: i64,
}

impl DnfRecord {
    pub fn from_progress(event_subgroup_id: &str, progress: &ProgressRow) -> Self {
        Self {
            id: 0,
            dnf: true,
            rider_id: progress.rider_id,
            event_subgroup_id: event_subgroup_id.to_string(),
            last_line_crossed: progress.line_id,
            last_crossing_time: progress.msec,
            distance_ridden: progress.meters,
        }
    }
}
