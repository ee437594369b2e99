//! Repository layer for ledger persistence.

use crate::domain::{ClosedTrade, Side, Symbol};
use crate::engine::Summary;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

const DB_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One persisted per-day snapshot of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub date_key: String,
    pub saved_at: String,
    pub count: i64,
    pub summary: Summary,
    pub trades: Vec<ClosedTrade>,
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert a closed trade idempotently, keyed by its identity key.
    /// Returns whether a row was actually added; a duplicate is a no-op,
    /// which makes repeated ingestion of the same log safe.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_trade(&self, trade: &ClosedTrade) -> Result<bool, sqlx::Error> {
        let tags_json = serde_json::to_string(&trade.tags).unwrap_or_else(|_| "[]".to_string());
        let result = sqlx::query(
            r#"
            INSERT INTO trades (
                trade_key, symbol, side, size, entry_price, exit_price,
                entry_at, exit_at, pips, pl_text, hold,
                ticket_open, ticket_close, tags, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(trade_key) DO NOTHING
            "#,
        )
        .bind(trade.identity_key())
        .bind(trade.symbol.as_str())
        .bind(trade.side.to_string())
        .bind(trade.size)
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(datetime_to_db(trade.entry_at))
        .bind(datetime_to_db(trade.exit_at))
        .bind(trade.pips)
        .bind(trade.pl_text.as_deref())
        .bind(trade.hold.as_deref())
        .bind(trade.ticket_open.as_deref())
        .bind(trade.ticket_close.as_deref())
        .bind(tags_json)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All trades in insertion order (the merge order of the ledger).
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_trades(&self) -> Result<Vec<ClosedTrade>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT symbol, side, size, entry_price, exit_price,
                   entry_at, exit_at, pips, pl_text, hold,
                   ticket_open, ticket_close, tags
            FROM trades
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_trade).collect())
    }

    /// Number of trades in the ledger.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_trades(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trades")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Delete trades by identity key. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_trades(&self, keys: &[String]) -> Result<u64, sqlx::Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!("DELETE FROM trades WHERE trade_key IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for key in keys {
            query = query.bind(key);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Replace the tag set on the selected trades. Returns the number of
    /// trades updated.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_tags(&self, keys: &[String], tags: &[String]) -> Result<u64, sqlx::Error> {
        if keys.is_empty() {
            return Ok(0);
        }
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "UPDATE trades SET tags = ? WHERE trade_key IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(tags_json);
        for key in keys {
            query = query.bind(key);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Store or overwrite the snapshot for one calendar day.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn upsert_snapshot(&self, snapshot: &SnapshotRecord) -> Result<(), sqlx::Error> {
        let summary_json =
            serde_json::to_string(&snapshot.summary).unwrap_or_else(|_| "{}".to_string());
        let trades_json =
            serde_json::to_string(&snapshot.trades).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO snapshots (date_key, saved_at, trade_count, summary_json, trades_json)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(date_key) DO UPDATE SET
                saved_at = excluded.saved_at,
                trade_count = excluded.trade_count,
                summary_json = excluded.summary_json,
                trades_json = excluded.trades_json
            "#,
        )
        .bind(&snapshot.date_key)
        .bind(&snapshot.saved_at)
        .bind(snapshot.count)
        .bind(summary_json)
        .bind(trades_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All snapshots, newest date first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_snapshots(&self) -> Result<Vec<SnapshotRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT date_key, saved_at, trade_count, summary_json, trades_json
            FROM snapshots
            ORDER BY date_key DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let snapshots = rows
            .iter()
            .map(|row| {
                let summary_json: String = row.get("summary_json");
                let trades_json: String = row.get("trades_json");
                SnapshotRecord {
                    date_key: row.get("date_key"),
                    saved_at: row.get("saved_at"),
                    count: row.get("trade_count"),
                    summary: serde_json::from_str(&summary_json)
                        .unwrap_or_else(|_| crate::engine::summarize(&[])),
                    trades: serde_json::from_str(&trades_json).unwrap_or_default(),
                }
            })
            .collect();

        Ok(snapshots)
    }

    /// Drop all snapshots. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn clear_snapshots(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM snapshots")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn row_to_trade(row: &sqlx::sqlite::SqliteRow) -> ClosedTrade {
    let side_str: String = row.get("side");
    let side = match side_str.as_str() {
        "SELL" => Side::Sell,
        _ => Side::Buy,
    };

    let symbol: String = row.get("symbol");
    let entry_at: Option<String> = row.get("entry_at");
    let exit_at: Option<String> = row.get("exit_at");
    let tags_json: String = row.get("tags");

    ClosedTrade {
        symbol: Symbol::new(symbol),
        side,
        size: row.get("size"),
        entry_price: row.get("entry_price"),
        exit_price: row.get("exit_price"),
        entry_at: entry_at.as_deref().and_then(datetime_from_db),
        exit_at: exit_at.as_deref().and_then(datetime_from_db),
        pips: row.get("pips"),
        pl_text: row.get("pl_text"),
        hold: row.get("hold"),
        ticket_open: row.get("ticket_open"),
        ticket_close: row.get("ticket_close"),
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
    }
}

fn datetime_to_db(at: Option<NaiveDateTime>) -> Option<String> {
    at.map(|t| t.format(DB_DATETIME_FORMAT).to_string())
}

fn datetime_from_db(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DB_DATETIME_FORMAT).ok()
}
