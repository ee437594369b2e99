use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use super::AppState;
use crate::engine::{
    goal_projection, intraday_pace, long_term_projection, summarize, tag_analysis, GoalProjection,
    LongTermProjection, Summary, TagAnalysis,
};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: Summary,
    pub tag_analysis: Vec<TagAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term: Option<LongTermProjection>,
    pub goal: GoalProjection,
    /// Projected end-of-day P&L; absent before the second trade of the day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intraday_pace: Option<f64>,
}

/// Overall performance statistics plus the derived projections, computed
/// fresh from the full ledger on every call.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let trades = state.repo.list_trades().await?;
    let summary = summarize(&trades);
    let tag_analysis = tag_analysis(&trades);

    let long_term = long_term_projection(&trades, &summary, state.config.start_balance);
    let goal = goal_projection(
        &summary,
        long_term.as_ref(),
        state.config.start_balance,
        state.config.target_balance,
    );
    let intraday_pace = intraday_pace(&trades, Local::now().naive_local());

    Ok(Json(SummaryResponse {
        summary,
        tag_analysis,
        long_term,
        goal,
        intraday_pace,
    }))
}
