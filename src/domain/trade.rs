//! Ledger entities: open positions and closed round-trip trades.

use crate::domain::datetime::epoch_ms;
use crate::domain::{Side, Symbol};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An unmatched OPEN event waiting in a per-symbol queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPosition {
    pub symbol: Symbol,
    pub side: Side,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_open: Option<String>,
}

/// One settled round-trip trade, the principal ledger entity.
///
/// Produced once per CLOSE event whether or not an open leg was found;
/// an unmatched close simply leaves the entry-side fields blank.
/// Immutable after matching except for `tags`, which the journal editor
/// rewrites freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTrade {
    pub symbol: Symbol,
    /// Side of the original open leg (inferred when unmatched).
    pub side: Side,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pips: Option<f64>,
    /// Monetary P&L, pre-rendered as an integer string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pl_text: Option<String>,
    /// Humanized hold duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_close: Option<String>,
    /// User-assigned labels; preserved untouched through merge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ClosedTrade {
    /// Canonical identity key used for deduplication.
    ///
    /// Prices collapse to 5 decimals and size to 4 so that float noise
    /// between parses of the same log cannot produce false uniques.
    /// Timestamps contribute their epoch milliseconds, which makes the
    /// key invariant under serialization round-trips.
    pub fn identity_key(&self) -> String {
        [
            self.symbol.as_str().to_string(),
            self.side.to_string(),
            format!("{:.4}", self.size),
            fixed_or_empty(self.entry_price, 5),
            fixed_or_empty(self.exit_price, 5),
            epoch_or_empty(self.entry_at),
            epoch_or_empty(self.exit_at),
            self.ticket_open.clone().unwrap_or_default(),
            self.ticket_close.clone().unwrap_or_default(),
        ]
        .join("|")
    }

    /// Monetary value of this trade in currency units (pips x size x 100),
    /// zero when pips are unknown.
    pub fn quantity_pl(&self) -> f64 {
        self.pips.unwrap_or(0.0) * self.size * 100.0
    }

    /// Hold duration in milliseconds, when both timestamps are present.
    pub fn hold_ms(&self) -> Option<i64> {
        match (self.entry_at, self.exit_at) {
            (Some(entry), Some(exit)) => Some(epoch_ms(exit) - epoch_ms(entry)),
            _ => None,
        }
    }
}

fn fixed_or_empty(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_default()
}

fn epoch_or_empty(at: Option<NaiveDateTime>) -> String {
    at.map(|t| epoch_ms(t).to_string()).unwrap_or_default()
}
