use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::domain::OpenPosition;
use crate::engine;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Trades newly added to the ledger; re-pasting the same log adds 0.
    pub added: usize,
    /// Total trades in the ledger after the merge.
    pub total: i64,
    /// Per-block warnings from unreadable input. Never fatal.
    pub errors: Vec<String>,
    /// Positions opened in the pasted log but not closed by it.
    pub open_positions: Vec<OpenPosition>,
}

/// Parse pasted broker log text and merge the resulting trades into the
/// ledger. Duplicate trades (same identity key) are silently skipped, so
/// overlapping copy-pastes are safe.
pub async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".into()));
    }

    let outcome = engine::parse(&request.text);

    let mut added = 0;
    for trade in &outcome.closed_trades {
        if state.repo.insert_trade(trade).await? {
            added += 1;
        }
    }
    let total = state.repo.count_trades().await?;

    info!(
        added,
        total,
        parsed = outcome.closed_trades.len(),
        warnings = outcome.errors.len(),
        "ingested log text"
    );

    Ok(Json(IngestResponse {
        added,
        total,
        errors: outcome.errors,
        open_positions: outcome.open_positions,
    }))
}
