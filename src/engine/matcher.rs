//! Pairing close events against open positions, first-in-first-out.

use crate::domain::{
    epoch_ms, humanize_ms, Action, ClosedTrade, OpenPosition, Symbol,
};
use crate::parser::TradeEvent;
use std::collections::HashMap;

/// Size comparison tolerance when pairing a close against an open.
const SIZE_EPS: f64 = 1e-6;

/// 0.01 price units = 1 pip for a JPY-quoted pair. Fixed by convention,
/// not configurable.
const PIPS_PER_PRICE_UNIT: f64 = 100.0;

/// Lot-to-currency scaling for the monetary P&L column. Independent of
/// the pip multiplier above even though both happen to be 100.
const QTY_SCALE: f64 = 100.0;

/// Per-symbol queues of unmatched opens, plus the closed trades
/// produced so far. Lives for exactly one replay.
pub struct PositionBook {
    queues: HashMap<Symbol, Vec<OpenPosition>>,
    closed: Vec<ClosedTrade>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            closed: Vec::new(),
        }
    }

    /// Replay events in chronological order and return the closed trades
    /// alongside whatever is still open. Events without a timestamp sort
    /// as if they happened at epoch zero.
    pub fn replay(mut events: Vec<TradeEvent>) -> (Vec<ClosedTrade>, Vec<OpenPosition>) {
        events.sort_by_key(|e| e.at.map(epoch_ms).unwrap_or(0));

        let mut book = PositionBook::new();
        for event in &events {
            book.process_event(event);
        }
        book.into_outputs()
    }

    pub fn process_event(&mut self, event: &TradeEvent) {
        match event.action {
            Action::Open => self.handle_open(event),
            Action::Close => self.handle_close(event),
        }
    }

    fn handle_open(&mut self, event: &TradeEvent) {
        self.queues
            .entry(event.symbol.clone())
            .or_default()
            .push(OpenPosition {
                symbol: event.symbol.clone(),
                side: event.side,
                size: event.size,
                entry_price: event.order_price,
                entry_at: event.at,
                ticket_open: event.ticket.clone(),
            });
    }

    /// A close settles the first queued opposite-side position of equal
    /// size, scanning from the front. This is deliberately not a strict
    /// dequeue: when the oldest open has a different size, a younger one
    /// further back can match instead.
    fn handle_close(&mut self, event: &TradeEvent) {
        let wanted = event.side.opposite();
        let queue = self.queues.entry(event.symbol.clone()).or_default();
        let matched = queue
            .iter()
            .position(|p| p.side == wanted && (p.size - event.size).abs() < SIZE_EPS)
            .map(|index| queue.remove(index));

        let mut trade = ClosedTrade {
            symbol: event.symbol.clone(),
            side: matched.as_ref().map(|p| p.side).unwrap_or(wanted),
            size: event.size,
            entry_price: matched.as_ref().and_then(|p| p.entry_price),
            exit_price: event.order_price,
            entry_at: matched.as_ref().and_then(|p| p.entry_at),
            exit_at: event.at,
            pips: None,
            pl_text: None,
            hold: None,
            ticket_open: matched.and_then(|p| p.ticket_open),
            ticket_close: event.ticket.clone(),
            tags: Vec::new(),
        };

        if let (Some(entry), Some(exit)) = (trade.entry_price, trade.exit_price) {
            let pips = (exit - entry) * trade.side.sign() * PIPS_PER_PRICE_UNIT;
            trade.pips = Some(pips);
            trade.pl_text = Some(format!("{}", (pips * trade.size * QTY_SCALE).round() as i64));
        }
        if let Some(hold_ms) = trade.hold_ms() {
            trade.hold = Some(humanize_ms(hold_ms));
        }

        self.closed.push(trade);
    }

    /// Closed trades in close order, plus the dangling open positions
    /// sorted by symbol and entry time for a deterministic result.
    pub fn into_outputs(self) -> (Vec<ClosedTrade>, Vec<OpenPosition>) {
        let mut open: Vec<OpenPosition> = self.queues.into_values().flatten().collect();
        open.sort_by(|a, b| {
            let at_a = a.entry_at.map(epoch_ms).unwrap_or(0);
            let at_b = b.entry_at.map(epoch_ms).unwrap_or(0);
            a.symbol.cmp(&b.symbol).then(at_a.cmp(&at_b))
        });
        (self.closed, open)
    }
}

impl Default for PositionBook {
    fn default() -> Self {
        Self::new()
    }
}
