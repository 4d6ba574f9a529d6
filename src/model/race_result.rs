use serde::{Deserialize, Serialize};

use crate::model::dnf_record::DnfRecord;
use crate::model::timing_result::TimingResult;

/// Entry of the `fullResults` listing: a finisher or a non-finisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RaceResult {
    // DNF first: its shape is stricter, a finisher would otherwise swallow it on deserialize
    NonFinisher(DnfRecord),
    Finisher(TimingResult),
}

impl RaceResult {
    pub fn rider_id(&self) -> i64 {
        match self {
            RaceResult::Finisher(r) => r.rider_id,
            RaceResult::NonFinisher(d) => d.rider_id,
        }
    }
}
