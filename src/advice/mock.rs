//! Mock advice source for testing without network calls.

use super::{AdviceError, AdviceSource};
use crate::domain::ClosedTrade;
use crate::engine::Summary;
use async_trait::async_trait;

/// Mock advice source that returns a predefined message or error.
#[derive(Debug, Clone)]
pub struct MockAdviceSource {
    message: String,
    error: Option<AdviceError>,
}

impl MockAdviceSource {
    /// Create a new mock advice source with a canned message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Make every call fail with the given error.
    pub fn with_error(mut self, error: AdviceError) -> Self {
        self.error = Some(error);
        self
    }
}

impl Default for MockAdviceSource {
    fn default() -> Self {
        Self::new("甘えるな。ロットを落として出直せ。")
    }
}

#[async_trait]
impl AdviceSource for MockAdviceSource {
    async fn generate_advice(
        &self,
        _summary: &Summary,
        _recent_trades: &[ClosedTrade],
    ) -> Result<String, AdviceError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.message.clone())
    }
}
