use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::dnf::derive_dnfs;
use crate::error::{RaceResultsError, Result};
use crate::model::api_gateway::{ApiGatewayRequest, ApiGatewayResponse};
use crate::model::dnf_record::DnfRecord;
use crate::model::progress_row::ProgressRow;
use crate::model::race_result::RaceResult;
use crate::model::timing_result::TimingResult;
use crate::progress::{ProgressStore, fetch_progress};
use crate::results::{SegmentResultsSource, fetch_results};

pub const EVENT_SUBGROUP_PARAM: &str = "eventSubgroupId";

/// Long-lived collaborators shared by every invocation of the container.
#[derive(Clone)]
pub struct AppContext {
    pub results: Arc<dyn SegmentResultsSource>,
    pub progress: Arc<dyn ProgressStore>,
}

impl AppContext {
    pub fn new(results: Arc<dyn SegmentResultsSource>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { results, progress }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SegmentResults,
    Dnfs,
    FullResults,
}

impl Route {
    /// Match on the last path segment so stage prefixes like `/prod` still route.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/').rsplit('/').next()? {
            "segment-results" => Some(Route::SegmentResults),
            "dnfs" => Some(Route::Dnfs),
            "fullResults" => Some(Route::FullResults),
            _ => None,
        }
    }
}

/// Finishers of the subgroup, fastest first.
pub async fn segment_results(ctx: &AppContext, event_subgroup_id: &str) -> Result<Vec<TimingResult>> {
    fetch_results(ctx.results.as_ref(), event_subgroup_id).await
}

/// Riders with telemetry but no finish, most advanced first.
pub async fn dnfs(ctx: &AppContext, event_subgroup_id: &str) -> Result<Vec<DnfRecord>> {
    let (results, progress) = results_and_progress(ctx, event_subgroup_id).await?;
    Ok(derive_dnfs(event_subgroup_id, &results, &progress))
}

/// Finishers followed by non-finishers.
pub async fn full_results(ctx: &AppContext, event_subgroup_id: &str) -> Result<Vec<RaceResult>> {
    let (results, progress) = results_and_progress(ctx, event_subgroup_id).await?;
    let dnfs = derive_dnfs(event_subgroup_id, &results, &progress);
    let mut full: Vec<RaceResult> = Vec::with_capacity(results.len() + dnfs.len());
    full.extend(results.into_iter().map(RaceResult::Finisher));
    full.extend(dnfs.into_iter().map(RaceResult::NonFinisher));
    Ok(full)
}

// Both fetches run concurrently; the first failure fails the request.
async fn results_and_progress(ctx: &AppContext, event_subgroup_id: &str) -> Result<(Vec<TimingResult>, Vec<ProgressRow>)> {
    tokio::try_join!(
        fetch_results(ctx.results.as_ref(), event_subgroup_id),
        fetch_progress(ctx.progress.as_ref(), event_subgroup_id),
    )
}

fn ok_json<T: Serialize>(body: &T) -> Result<ApiGatewayResponse> {
    Ok(ApiGatewayResponse::json(200, serde_json::to_string(body)?))
}

fn not_found(request: &ApiGatewayRequest) -> Result<ApiGatewayResponse> {
    let body = serde_json::json!({
        "message": format!("No route for {} {}", request.http_method, request.path)
    });
    Ok(ApiGatewayResponse::json(404, body.to_string()))
}

/// Route an API Gateway proxy request to its operation and encode the answer.
#[instrument(level = "info", skip(ctx, request), fields(method = %request.http_method, path = %request.path))]
pub async fn dispatch(ctx: &AppContext, request: &ApiGatewayRequest) -> Result<ApiGatewayResponse> {
    let route = match Route::from_path(&request.path) {
        Some(route) if request.http_method.eq_ignore_ascii_case("GET") => route,
        _ => {
            info!("Unmatched route");
            return not_found(request);
        }
    };
    let event_subgroup_id = request
        .query(EVENT_SUBGROUP_PARAM)
        .ok_or(RaceResultsError::MissingParameter(EVENT_SUBGROUP_PARAM))?;

    let response = match route {
        Route::SegmentResults => ok_json(&segment_results(ctx, event_subgroup_id).await?),
        Route::Dnfs => ok_json(&dnfs(ctx, event_subgroup_id).await?),
        Route::FullResults => ok_json(&full_results(ctx, event_subgroup_id).await?),
    }?;
    info!(?route, event_subgroup_id, status = response.status_code, "Handled request");
    Ok(response)
}

/// Lambda entry point; errors go back to API Gateway as the invocation failure.
pub async fn handler(ctx: &AppContext, event: LambdaEvent<ApiGatewayRequest>) -> Result<ApiGatewayResponse, Error> {
    dispatch(ctx, &event.payload).await.map_err(|e| {
        error!(error = %e, "Request failed");
        Error::from(e)
    })
}
