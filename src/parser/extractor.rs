//! Extracting structured trade events from raw log blocks.

use super::splitter::RawBlock;
use crate::domain::{parse_log_datetime, Action, Side, Symbol};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+\S+\s+(新規|決済)$").expect("valid pattern"));

/// First detail line: side token, lot size, then the order price glued to
/// a bracketed order-type annotation whose contents are ignored.
static DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(買|売)\s*([\d.]+)\s*([\d.]+)\[[^\]]+\]").expect("valid pattern")
});

static DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{2}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}").expect("valid pattern")
});

/// First run of 6+ consecutive digits anywhere in the block is a ticket id.
static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{6,})\b").expect("valid pattern"));

/// One parsed log entry, before position matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub symbol: Symbol,
    pub action: Action,
    pub side: Side,
    pub size: f64,
    pub order_price: Option<f64>,
    pub at: Option<NaiveDateTime>,
    pub ticket: Option<String>,
}

/// Events plus the warnings accumulated while reading the blocks.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub events: Vec<TradeEvent>,
    pub errors: Vec<String>,
}

/// Extract one event per readable block.
///
/// Malformed blocks degrade to warnings and are skipped; nothing here
/// aborts processing of the remaining blocks. Missing timestamps and
/// tickets are tolerated silently.
pub fn extract_events(blocks: &[RawBlock]) -> Extraction {
    let mut extraction = Extraction::default();

    for block in blocks {
        let header = block.header.trim();
        let Some(head) = HEADER_RE.captures(header) else {
            extraction
                .errors
                .push(format!("ブロック見出しを認識できませんでした: \"{}\"", header));
            continue;
        };
        let symbol = Symbol::new(&head[1]);
        let action = match &head[2] {
            "新規" => Action::Open,
            _ => Action::Close,
        };

        let mut side = None;
        let mut size = None;
        let mut order_price = None;
        let detail = block.lines.first().map(|l| l.trim()).unwrap_or("");
        if let Some(caps) = DETAIL_RE.captures(detail) {
            side = Some(if &caps[1] == "買" { Side::Buy } else { Side::Sell });
            size = caps[2].parse::<f64>().ok().filter(|n| n.is_finite());
            order_price = caps[3].parse::<f64>().ok().filter(|n| n.is_finite());
        } else {
            extraction
                .errors
                .push(format!("方向/数量/建値を読めませんでした: \"{}\"", detail));
        }

        // Timestamp lives on the second body line, or occasionally the third.
        let mut at = None;
        for line in block.lines.iter().skip(1).take(2) {
            if let Some(found) = DATETIME_RE.find(line) {
                at = parse_log_datetime(found.as_str());
                if at.is_some() {
                    break;
                }
            }
        }

        let ticket = block
            .lines
            .iter()
            .find_map(|line| TICKET_RE.find(line).map(|m| m.as_str().to_string()));

        let (Some(side), Some(size)) = (side, size) else {
            extraction.errors.push(format!(
                "必須項目が不足しているため、このブロックを無視: \"{}\"",
                header
            ));
            continue;
        };

        extraction.events.push(TradeEvent {
            symbol,
            action,
            side,
            size,
            order_price,
            at,
            ticket,
        });
    }

    extraction
}
