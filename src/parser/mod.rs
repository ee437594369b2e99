//! Broker log text parsing: block splitting and event extraction.

pub mod extractor;
pub mod splitter;

pub use extractor::{extract_events, Extraction, TradeEvent};
pub use splitter::{split_blocks, RawBlock};
