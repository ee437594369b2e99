//! Balance projections derived from the ledger's daily pace.

use crate::domain::{date_key, epoch_ms, ClosedTrade};
use crate::engine::summary::Summary;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;

/// Projected balance after some horizon, with the gain over today.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub balance: f64,
    pub gain: f64,
}

/// Week/month/year extrapolation of the average daily P&L.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermProjection {
    pub avg_daily_pl: f64,
    pub weekly: BalancePoint,
    pub monthly: BalancePoint,
    pub yearly: BalancePoint,
}

/// Whether and when the target balance is reached at the current pace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub status: GoalStatus,
    /// Days until the target; absent when unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Achieved,
    Unreachable,
    Projected,
}

/// Extrapolate the ledger's average daily P&L out to a week, a month and
/// a year. None when no trade carries an exit timestamp.
pub fn long_term_projection(
    trades: &[ClosedTrade],
    summary: &Summary,
    start_balance: f64,
) -> Option<LongTermProjection> {
    let trade_days: BTreeSet<String> = trades
        .iter()
        .filter_map(|t| t.exit_at.map(date_key))
        .collect();
    if trade_days.is_empty() {
        return None;
    }

    let avg_daily_pl = summary.total_qty_pl as f64 / trade_days.len() as f64;
    let current_balance = start_balance + summary.total_qty_pl as f64;
    let point = |days: f64| BalancePoint {
        balance: current_balance + avg_daily_pl * days,
        gain: avg_daily_pl * days,
    };

    Some(LongTermProjection {
        avg_daily_pl,
        weekly: point(7.0),
        monthly: point(30.0),
        yearly: point(365.0),
    })
}

/// Days until the target balance at the current daily pace.
pub fn goal_projection(
    summary: &Summary,
    long_term: Option<&LongTermProjection>,
    start_balance: f64,
    target_balance: f64,
) -> GoalProjection {
    let current_balance = start_balance + summary.total_qty_pl as f64;
    if target_balance <= current_balance {
        return GoalProjection {
            status: GoalStatus::Achieved,
            days: Some(0),
        };
    }
    let Some(projection) = long_term.filter(|p| p.avg_daily_pl > 0.0) else {
        return GoalProjection {
            status: GoalStatus::Unreachable,
            days: None,
        };
    };

    let profit_needed = target_balance - current_balance;
    GoalProjection {
        status: GoalStatus::Projected,
        days: Some((profit_needed / projection.avg_daily_pl).ceil() as i64),
    }
}

/// Project today's end-of-day P&L from the realized per-hour rate.
///
/// Requires at least two trades closed today; returns None otherwise, or
/// when they all closed at the same instant.
pub fn intraday_pace(trades: &[ClosedTrade], now: NaiveDateTime) -> Option<f64> {
    let today = date_key(now);
    let mut todays: Vec<&ClosedTrade> = trades
        .iter()
        .filter(|t| t.exit_at.map(date_key).as_deref() == Some(today.as_str()))
        .collect();
    if todays.len() < 2 {
        return None;
    }
    todays.sort_by_key(|t| t.exit_at.map(epoch_ms).unwrap_or(0));

    let first_ms = todays.first()?.exit_at.map(epoch_ms)?;
    let last_ms = todays.last()?.exit_at.map(epoch_ms)?;
    let elapsed_ms = last_ms - first_ms;
    if elapsed_ms <= 0 {
        return None;
    }

    let today_pl: f64 = todays.iter().map(|t| t.quantity_pl()).sum();
    let rate_per_hour = today_pl / (elapsed_ms as f64 / 3_600_000.0);

    let end_of_day = now.date().and_hms_milli_opt(23, 59, 59, 999)?;
    let remaining_hours = ((epoch_ms(end_of_day) - last_ms).max(0)) as f64 / 3_600_000.0;

    Some(today_pl + rate_per_hour * remaining_hours)
}
