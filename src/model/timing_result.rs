use serde::{Deserialize, Serialize};

/// One rider's finish record for an event subgroup, as returned by the Zwift relay.
///
/// Only the fields this service reasons about are typed; everything else the relay
/// sends is kept in `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingResult {
    pub rider_id: i64,
    pub elapsed_ms: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TimingResult {
    pub fn new(rider_id: i64, elapsed_ms: i64) -> Self {
        Self { rider_id, elapsed_ms, extra: serde_json::Map::new() }
    }
}

/// Envelope of the relay's `segment-results` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResults {
    #[serde(default, alias = "segment_results", alias = "results")]
    pub segment_results: Vec<TimingResult>,
}
