//! Duplicate-free merging of trade sets by identity key.

use crate::domain::ClosedTrade;
use std::collections::HashSet;

/// Result of merging an incoming trade set onto an existing one.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub merged: Vec<ClosedTrade>,
    pub added: usize,
}

/// Append the incoming trades whose identity key is not already present,
/// preserving order. Pure set membership: nothing is removed or mutated.
pub fn merge_unique_with_count(
    existing: &[ClosedTrade],
    incoming: &[ClosedTrade],
) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(ClosedTrade::identity_key).collect();
    let mut merged = existing.to_vec();
    let mut added = 0;

    for trade in incoming {
        let key = trade.identity_key();
        if seen.insert(key) {
            merged.push(trade.clone());
            added += 1;
        }
    }

    MergeOutcome { merged, added }
}
