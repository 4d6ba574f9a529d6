use async_trait::async_trait;
use tracing::{info, instrument};

use crate::error::Result;
use crate::model::timing_result::TimingResult;

/// Anything that can list the raw segment results of an event subgroup.
#[async_trait]
pub trait SegmentResultsSource: Send + Sync {
    async fn segment_results(&self, event_subgroup_id: &str) -> Result<Vec<TimingResult>>;
}

/// Fetch the subgroup's results, fastest first.
#[instrument(level = "info", skip(source))]
pub async fn fetch_results(source: &dyn SegmentResultsSource, event_subgroup_id: &str) -> Result<Vec<TimingResult>> {
    let mut results = source.segment_results(event_subgroup_id).await?;
    sort_by_elapsed(&mut results);
    info!(count = results.len(), "Sorted segment results");
    Ok(results)
}

/// Stable: riders with equal times keep the order the source gave them.
pub fn sort_by_elapsed(results: &mut [TimingResult]) {
    results.sort_by_key(|r| r.elapsed_ms);
}
