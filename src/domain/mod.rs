//! Domain types for the trade journal.
//!
//! This module provides:
//! - Domain primitives: Symbol, Side, Action
//! - Ledger entities: OpenPosition and ClosedTrade with identity keys
//! - Timestamp helpers for the two-digit-year broker log format

pub mod datetime;
pub mod primitives;
pub mod trade;

pub use datetime::{date_key, epoch_ms, humanize_ms, parse_log_datetime};
pub use primitives::{Action, Side, Symbol};
pub use trade::{ClosedTrade, OpenPosition};
