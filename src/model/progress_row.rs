use serde::{Deserialize, Serialize};

/// Furthest observed telemetry sample for one rider, one row of `live_results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressRow {
    #[sqlx(rename = "riderid")]
    #[serde(rename = "riderid")]
    pub rider_id: i64,
    #[sqlx(rename = "lineid")]
    #[serde(rename = "lineid")]
    pub line_id: i64,
    pub meters: i64,
    pub msec: i64,
}
