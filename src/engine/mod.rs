//! Pure computation engines over the parsed ledger.

use crate::domain::{ClosedTrade, OpenPosition};
use crate::parser::{extract_events, split_blocks};

pub mod calendar;
pub mod matcher;
pub mod merge;
pub mod projection;
pub mod summary;
pub mod tags;

pub use calendar::daily_pl;
pub use matcher::PositionBook;
pub use merge::{merge_unique_with_count, MergeOutcome};
pub use projection::{
    goal_projection, intraday_pace, long_term_projection, BalancePoint, GoalProjection,
    GoalStatus, LongTermProjection,
};
pub use summary::{summarize, Summary};
pub use tags::{tag_analysis, TagAnalysis};

/// Everything produced by one pass over pasted log text.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub closed_trades: Vec<ClosedTrade>,
    pub open_positions: Vec<OpenPosition>,
    pub errors: Vec<String>,
}

/// Parse raw broker log text into closed trades and leftover opens.
///
/// Deterministic and side-effect free: split into blocks, extract the
/// events, replay them through a fresh position book. Warnings from
/// unreadable blocks ride along in `errors`; nothing here fails.
pub fn parse(input: &str) -> ParseOutcome {
    let blocks = split_blocks(input);
    let extraction = extract_events(&blocks);
    let (closed_trades, open_positions) = PositionBook::replay(extraction.events);
    ParseOutcome {
        closed_trades,
        open_positions,
        errors: extraction.errors,
    }
}
