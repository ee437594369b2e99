use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::ClosedTrade;
use crate::error::AppError;

const CSV_HEADER: [&str; 14] = [
    "tradeKey",
    "symbol",
    "side",
    "size",
    "entryPrice",
    "exitPrice",
    "entryAt",
    "exitAt",
    "pips",
    "plText",
    "hold",
    "ticketOpen",
    "ticketClose",
    "tags",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesResponse {
    pub trades: Vec<TradeDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDto {
    pub trade_key: String,
    #[serde(flatten)]
    pub trade: ClosedTrade,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTradesRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTradesResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagsRequest {
    pub keys: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagsResponse {
    pub updated: u64,
}

/// All trades in the ledger, in merge order, each with its identity key so
/// callers can address rows for deletion or tagging.
pub async fn list_trades(State(state): State<AppState>) -> Result<Json<TradesResponse>, AppError> {
    let trades = state.repo.list_trades().await?;
    let total = trades.len();
    let dtos = trades
        .into_iter()
        .map(|trade| TradeDto {
            trade_key: trade.identity_key(),
            trade,
        })
        .collect();

    Ok(Json(TradesResponse {
        trades: dtos,
        total,
    }))
}

pub async fn delete_trades(
    State(state): State<AppState>,
    Json(request): Json<DeleteTradesRequest>,
) -> Result<Json<DeleteTradesResponse>, AppError> {
    if request.keys.is_empty() {
        return Err(AppError::BadRequest("keys must not be empty".into()));
    }
    let deleted = state.repo.delete_trades(&request.keys).await?;
    Ok(Json(DeleteTradesResponse { deleted }))
}

/// Replace the tag set on the selected trades.
pub async fn update_tags(
    State(state): State<AppState>,
    Json(request): Json<UpdateTagsRequest>,
) -> Result<Json<UpdateTagsResponse>, AppError> {
    if request.keys.is_empty() {
        return Err(AppError::BadRequest("keys must not be empty".into()));
    }
    let updated = state.repo.update_tags(&request.keys, &request.tags).await?;
    Ok(Json(UpdateTagsResponse { updated }))
}

/// Download the ledger as CSV. Tags are joined with `;` inside one column.
pub async fn export_trades(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trades = state.repo.list_trades().await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    for trade in &trades {
        writer
            .write_record(trade_record(trade))
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"trades.csv\"",
            ),
        ],
        body,
    ))
}

fn trade_record(trade: &ClosedTrade) -> Vec<String> {
    let fmt_num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    let fmt_at = |v: Option<chrono::NaiveDateTime>| {
        v.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    };

    vec![
        trade.identity_key(),
        trade.symbol.as_str().to_string(),
        trade.side.to_string(),
        trade.size.to_string(),
        fmt_num(trade.entry_price),
        fmt_num(trade.exit_price),
        fmt_at(trade.entry_at),
        fmt_at(trade.exit_at),
        fmt_num(trade.pips),
        trade.pl_text.clone().unwrap_or_default(),
        trade.hold.clone().unwrap_or_default(),
        trade.ticket_open.clone().unwrap_or_default(),
        trade.ticket_close.clone().unwrap_or_default(),
        trade.tags.join(";"),
    ]
}
