//! Per-tag performance breakdown.

use crate::domain::ClosedTrade;
use crate::engine::summary::{summarize, Summary};
use serde::Serialize;
use std::collections::BTreeSet;

/// Summary of every trade carrying a given tag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAnalysis {
    pub tag_name: String,
    pub summary: Summary,
}

/// One analysis entry per distinct tag, sorted by descending trade
/// count. Untagged trades contribute to nothing here.
pub fn tag_analysis(trades: &[ClosedTrade]) -> Vec<TagAnalysis> {
    let tags: BTreeSet<&str> = trades
        .iter()
        .flat_map(|t| t.tags.iter().map(String::as_str))
        .collect();

    let mut results: Vec<TagAnalysis> = tags
        .into_iter()
        .map(|tag| {
            let tagged: Vec<ClosedTrade> = trades
                .iter()
                .filter(|t| t.tags.iter().any(|candidate| candidate == tag))
                .cloned()
                .collect();
            TagAnalysis {
                tag_name: tag.to_string(),
                summary: summarize(&tagged),
            }
        })
        .collect();

    results.sort_by(|a, b| b.summary.count.cmp(&a.summary.count));
    results
}
