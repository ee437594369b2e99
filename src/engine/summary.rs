//! Aggregate statistics over a set of closed trades.

use crate::domain::{humanize_ms, ClosedTrade};
use serde::{Deserialize, Serialize};

/// Derived statistics for a trade collection. Recomputed fresh on every
/// call, never mutated in place.
///
/// Rate and average fields are NaN when undefined (empty ledger, no
/// losing trades for payoff, ...); they serialize as JSON null so that
/// callers render them as "-".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    #[serde(with = "nan_as_null")]
    pub win_rate: f64,
    pub total_pips: f64,
    #[serde(with = "nan_as_null")]
    pub avg_pips: f64,
    pub avg_hold: String,
    /// Worst peak-to-trough decline of the cumulative pip curve, >= 0.
    pub max_dd: f64,
    /// Total monetary P&L, rounded to whole currency units.
    pub total_qty_pl: i64,
    /// Expected monetary value per trade from the win/loss decomposition.
    #[serde(with = "nan_as_null")]
    pub expectancy_qty: f64,
    /// Average win magnitude over average loss magnitude.
    #[serde(with = "nan_as_null")]
    pub payoff: f64,
}

impl Summary {
    fn empty() -> Self {
        Summary {
            count: 0,
            win_rate: f64::NAN,
            total_pips: 0.0,
            avg_pips: f64::NAN,
            avg_hold: String::new(),
            max_dd: 0.0,
            total_qty_pl: 0,
            expectancy_qty: f64::NAN,
            payoff: f64::NAN,
        }
    }
}

/// Summarize a trade collection.
///
/// Trades without pips contribute zero to the pip totals and the equity
/// curve. Zero-P&L trades count toward `count` but toward neither the
/// win nor the loss bucket, which is why `expectancy_qty` is computed
/// from the decomposition rather than `total_qty_pl / count`.
pub fn summarize(rows: &[ClosedTrade]) -> Summary {
    if rows.is_empty() {
        return Summary::empty();
    }

    let mut total_pips = 0.0;
    let mut total_qty_pl = 0.0;
    let mut equity = 0.0;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    let mut wins: Vec<f64> = Vec::new();
    let mut losses: Vec<f64> = Vec::new();
    let mut holds: Vec<i64> = Vec::new();

    for trade in rows {
        let pips = trade.pips.unwrap_or(0.0);
        total_pips += pips;
        equity += pips;
        peak = peak.max(equity);
        max_dd = max_dd.min(equity - peak);

        let qty_pl = trade.quantity_pl();
        total_qty_pl += qty_pl;
        if qty_pl > 0.0 {
            wins.push(qty_pl);
        } else if qty_pl < 0.0 {
            losses.push(qty_pl);
        }

        if let Some(hold_ms) = trade.hold_ms() {
            holds.push(hold_ms);
        }
    }

    let count = rows.len();
    let win_rate = wins.len() as f64 / count as f64;
    let loss_rate = losses.len() as f64 / count as f64;
    let avg_win = mean(&wins);
    let avg_loss = mean(&losses);
    let payoff = if avg_loss != 0.0 && avg_win.is_finite() && avg_loss.is_finite() {
        (avg_win / avg_loss).abs()
    } else {
        f64::NAN
    };

    let avg_hold = if holds.is_empty() {
        String::new()
    } else {
        humanize_ms(holds.iter().sum::<i64>() / holds.len() as i64)
    };

    Summary {
        count,
        win_rate: win_rate * 100.0,
        total_pips,
        avg_pips: total_pips / count as f64,
        avg_hold,
        max_dd: max_dd.round().abs(),
        total_qty_pl: total_qty_pl.round() as i64,
        expectancy_qty: avg_win * win_rate - avg_loss.abs() * loss_rate,
        payoff,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Serialize non-finite floats as null, the JSON spelling of "undefined".
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_log_datetime, Side, Symbol};

    fn trade(pips: f64, size: f64) -> ClosedTrade {
        ClosedTrade {
            symbol: Symbol::new("USD/JPY"),
            side: Side::Buy,
            size,
            entry_price: Some(147.0),
            exit_price: Some(147.0 + pips / 100.0),
            entry_at: None,
            exit_at: None,
            pips: Some(pips),
            pl_text: None,
            hold: None,
            ticket_open: None,
            ticket_close: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_empty_input_degenerates_without_panicking() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.win_rate.is_nan());
        assert_eq!(summary.total_pips, 0.0);
        assert!(summary.avg_pips.is_nan());
        assert_eq!(summary.avg_hold, "");
        assert_eq!(summary.max_dd, 0.0);
        assert_eq!(summary.total_qty_pl, 0);
        assert!(summary.expectancy_qty.is_nan());
        assert!(summary.payoff.is_nan());
    }

    #[test]
    fn test_single_winning_trade() {
        let summary = summarize(&[trade(0.4, 2.7)]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.win_rate, 100.0);
        assert!((summary.total_pips - 0.4).abs() < 1e-9);
        assert_eq!(summary.total_qty_pl, 108);
        assert!((summary.expectancy_qty - 108.0).abs() < 1e-6);
        // no losses: payoff undefined, not infinite
        assert!(summary.payoff.is_nan());
    }

    #[test]
    fn test_payoff_and_expectancy_mixed() {
        // wins: +200, +100 (avg 150); losses: -100 (avg -100)
        let rows = vec![trade(2.0, 1.0), trade(1.0, 1.0), trade(-1.0, 1.0)];
        let summary = summarize(&rows);
        assert!((summary.payoff - 1.5).abs() < 1e-9);
        // 150 * 2/3 - 100 * 1/3
        assert!((summary.expectancy_qty - (100.0 + 100.0 / 3.0 - 100.0 / 3.0)).abs() < 1e-6);
        assert!((summary.win_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_pl_trades_dilute_rates_but_count() {
        let rows = vec![trade(1.0, 1.0), trade(0.0, 1.0)];
        let summary = summarize(&rows);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.win_rate, 50.0);
        // expectancy from decomposition: 100 * 0.5 - 0 = 50, which is
        // exactly total/count here but diverges in general
        assert!((summary.expectancy_qty - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_drawdown_peak_to_trough() {
        // equity: 10, 4, 1, 6 -> peak 10, trough 1, drawdown 9
        let rows = vec![
            trade(10.0, 1.0),
            trade(-6.0, 1.0),
            trade(-3.0, 1.0),
            trade(5.0, 1.0),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.max_dd, 9.0);
    }

    #[test]
    fn test_max_drawdown_non_negative_on_rising_curve() {
        let rows = vec![trade(1.0, 1.0), trade(2.0, 1.0)];
        assert_eq!(summarize(&rows).max_dd, 0.0);
    }

    #[test]
    fn test_missing_pips_counts_as_zero() {
        let mut blank = trade(0.0, 1.0);
        blank.pips = None;
        let summary = summarize(&[blank, trade(1.0, 1.0)]);
        assert_eq!(summary.count, 2);
        assert!((summary.total_pips - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_hold_ignores_trades_without_timestamps() {
        let mut timed = trade(1.0, 1.0);
        timed.entry_at = parse_log_datetime("25/08/22 03:00:00");
        timed.exit_at = parse_log_datetime("25/08/22 03:04:00");
        let summary = summarize(&[timed, trade(1.0, 1.0)]);
        assert_eq!(summary.avg_hold, "4分");
    }

    #[test]
    fn test_avg_hold_empty_when_no_timestamps() {
        assert_eq!(summarize(&[trade(1.0, 1.0)]).avg_hold, "");
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let json = serde_json::to_value(summarize(&[])).unwrap();
        assert!(json["winRate"].is_null());
        assert!(json["payoff"].is_null());
        assert_eq!(json["count"], 0);

        let revived: Summary = serde_json::from_value(json).unwrap();
        assert!(revived.win_rate.is_nan());
    }
}
