use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::advice::NO_DATA_MESSAGE;
use crate::domain::epoch_ms;
use crate::engine::summarize;
use crate::error::AppError;

const RECENT_TRADES: usize = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub message: String,
}

/// Generate a coaching message for the current ledger. An empty ledger gets
/// a fixed message without calling the upstream model.
pub async fn generate_advice(
    State(state): State<AppState>,
) -> Result<Json<AdviceResponse>, AppError> {
    let mut trades = state.repo.list_trades().await?;
    if trades.is_empty() {
        return Ok(Json(AdviceResponse {
            message: NO_DATA_MESSAGE.to_string(),
        }));
    }

    if state.config.openai_api_key.is_none() {
        return Err(AppError::Unavailable(
            "OPENAI_API_KEY is not configured".into(),
        ));
    }

    let summary = summarize(&trades);

    trades.sort_by_key(|t| t.exit_at.map(epoch_ms).unwrap_or(0));
    let recent_start = trades.len().saturating_sub(RECENT_TRADES);
    let recent = &trades[recent_start..];

    let message = state.advisor.generate_advice(&summary, recent).await?;
    Ok(Json(AdviceResponse { message }))
}
