use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::model::progress_row::ProgressRow;

/// Riders closer than this are ranked by who got there first.
pub const SAME_POSITION_METERS: i64 = 1000;

/// Source of raw live telemetry rows.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Every `live_results` row tagged with the subgroup, in storage order.
    async fn live_results(&self, event_subgroup_id: &str) -> Result<Vec<ProgressRow>>;
}

/// `live_results` in MySQL.
#[derive(Debug, Clone)]
pub struct MySqlProgressStore {
    pool: MySqlPool,
}

impl MySqlProgressStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Pool that opens its connection on first query and keeps it for the container's lifetime.
    pub fn connect_lazy(host: &str, user: &str, database: &str, password: Option<&str>) -> Self {
        let mut options = MySqlConnectOptions::new()
            .host(host)
            .username(user)
            .database(database)
            .charset("utf8mb4")
            .timezone(Some(String::from("+00:00")));
        if let Some(password) = password {
            options = options.password(password);
        }
        let pool = MySqlPoolOptions::new().max_connections(1).connect_lazy_with(options);
        Self::new(pool)
    }
}

#[async_trait]
impl ProgressStore for MySqlProgressStore {
    async fn live_results(&self, event_subgroup_id: &str) -> Result<Vec<ProgressRow>> {
        let rows = sqlx::query_as::<_, ProgressRow>(
            "SELECT riderid, lineid, meters, msec FROM live_results WHERE grp = ?",
        )
        .bind(event_subgroup_id)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| error!(error = %e, "live_results query failed"))?;
        Ok(rows)
    }
}

/// Furthest progress per rider for the subgroup, most advanced rider first.
#[instrument(level = "info", skip(store))]
pub async fn fetch_progress(store: &dyn ProgressStore, event_subgroup_id: &str) -> Result<Vec<ProgressRow>> {
    let rows = store.live_results(event_subgroup_id).await?;
    let raw_count = rows.len();
    let ranked = furthest_progress(rows);
    info!(raw_count, riders = ranked.len(), "Ranked rider progress");
    Ok(ranked)
}

/// Keep each rider's furthest row, then rank.
pub fn furthest_progress(rows: Vec<ProgressRow>) -> Vec<ProgressRow> {
    let mut ranked: Vec<ProgressRow> = dedup_furthest(rows).into_values().collect();
    rank(&mut ranked, compare_progress);
    ranked
}

/// One row per rider holding its maximum `meters`; the first row seen wins a tie.
pub fn dedup_furthest(rows: Vec<ProgressRow>) -> BTreeMap<i64, ProgressRow> {
    let mut furthest: BTreeMap<i64, ProgressRow> = BTreeMap::new();
    for row in rows {
        furthest
            .entry(row.rider_id)
            .and_modify(|best| {
                if row.meters > best.meters {
                    *best = row;
                }
            })
            .or_insert(row);
    }
    furthest
}

/// `Less` means `a` is further along than `b`.
///
/// Within [`SAME_POSITION_METERS`] of each other the earlier sample wins, whichever
/// line each rider last crossed; otherwise more meters wins.
pub fn compare_progress(a: &ProgressRow, b: &ProgressRow) -> Ordering {
    if (a.meters - b.meters).abs() < SAME_POSITION_METERS {
        a.msec.cmp(&b.msec)
    } else {
        b.meters.cmp(&a.meters)
    }
}

// compare_progress is not transitive and slice::sort_by may panic on such comparators,
// so rank with a stable insertion sort instead.
fn rank<F>(rows: &mut [ProgressRow], mut compare: F)
where
    F: FnMut(&ProgressRow, &ProgressRow) -> Ordering,
{
    for i in 1..rows.len() {
        let mut j = i;
        while j > 0 && compare(&rows[j - 1], &rows[j]) == Ordering::Greater {
            rows.swap(j - 1, j);
            j -= 1;
        }
    }
}
