//! Daily P&L aggregation for the calendar view.

use crate::domain::{date_key, ClosedTrade};
use std::collections::BTreeMap;

/// Sum monetary P&L per exit day, keyed `YYYY-MM-DD`. Trades without an
/// exit timestamp or without pips are skipped.
pub fn daily_pl(trades: &[ClosedTrade]) -> BTreeMap<String, f64> {
    let mut days: BTreeMap<String, f64> = BTreeMap::new();
    for trade in trades {
        if let (Some(exit_at), Some(pips)) = (trade.exit_at, trade.pips) {
            *days.entry(date_key(exit_at)).or_default() += pips * trade.size * 100.0;
        }
    }
    days
}
