use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use super::AppState;
use crate::engine::daily_pl;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    /// Realized P&L in yen per calendar day, keyed `YYYY-MM-DD`, ascending.
    pub daily_pl: BTreeMap<String, f64>,
}

pub async fn get_calendar(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, AppError> {
    let trades = state.repo.list_trades().await?;
    Ok(Json(CalendarResponse {
        daily_pl: daily_pl(&trades),
    }))
}
