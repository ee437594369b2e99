use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;
use std::collections::BTreeMap;

use super::AppState;
use crate::db::SnapshotRecord;
use crate::domain::{date_key, ClosedTrade};
use crate::engine::summarize;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshotsResponse {
    /// Days written or overwritten in this call.
    pub saved: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotsResponse {
    pub snapshots: Vec<SnapshotRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSnapshotsResponse {
    pub deleted: u64,
}

/// Record one snapshot per trading day currently in the ledger. A day's
/// snapshot is its trades plus their summary, frozen at save time; saving
/// again overwrites the day.
pub async fn save_snapshot(
    State(state): State<AppState>,
) -> Result<Json<SaveSnapshotsResponse>, AppError> {
    let trades = state.repo.list_trades().await?;
    if trades.is_empty() {
        return Err(AppError::BadRequest("no trades to snapshot".into()));
    }

    let mut by_day: BTreeMap<String, Vec<ClosedTrade>> = BTreeMap::new();
    for trade in trades {
        let Some(at) = trade.exit_at.or(trade.entry_at) else {
            continue;
        };
        by_day.entry(date_key(at)).or_default().push(trade);
    }

    let saved_at = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string();
    let saved = by_day.len();
    for (day, day_trades) in by_day {
        let snapshot = SnapshotRecord {
            date_key: day,
            saved_at: saved_at.clone(),
            count: day_trades.len() as i64,
            summary: summarize(&day_trades),
            trades: day_trades,
        };
        state.repo.upsert_snapshot(&snapshot).await?;
    }

    Ok(Json(SaveSnapshotsResponse { saved }))
}

pub async fn list_snapshots(
    State(state): State<AppState>,
) -> Result<Json<SnapshotsResponse>, AppError> {
    let snapshots = state.repo.list_snapshots().await?;
    Ok(Json(SnapshotsResponse { snapshots }))
}

pub async fn reset_snapshots(
    State(state): State<AppState>,
) -> Result<Json<ResetSnapshotsResponse>, AppError> {
    let deleted = state.repo.clear_snapshots().await?;
    Ok(Json(ResetSnapshotsResponse { deleted }))
}
