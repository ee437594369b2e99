//! Partitioning pasted log text into header-delimited blocks.

use regex::Regex;
use std::sync::LazyLock;

/// A header is exactly two tokens followed by an action token: symbol,
/// an ignored order-type column, then 新規 (open) or 決済 (close).
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+\s+\S+\s+(新規|決済)$").expect("valid pattern"));

/// One header-delimited chunk of the pasted log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub header: String,
    pub lines: Vec<String>,
}

/// Whether a trimmed line starts a new block.
pub fn is_header(line: &str) -> bool {
    HEADER_RE.is_match(line.trim())
}

/// Split raw text into blocks. Consecutive newlines collapse, lines
/// before the first header are dropped, and the absence of any header
/// yields an empty sequence.
pub fn split_blocks(input: &str) -> Vec<RawBlock> {
    let cleaned = input.replace('\r', "");
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;

    for line in cleaned.split('\n').filter(|l| !l.is_empty()) {
        if is_header(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(RawBlock {
                header: line.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(block) = current.as_mut() {
            block.lines.push(line.to_string());
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}
