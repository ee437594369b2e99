//! Advice source abstraction for generating coaching feedback from trade results.

use crate::domain::ClosedTrade;
use crate::engine::Summary;
use async_trait::async_trait;
use std::fmt;

pub mod mock;
pub mod openai;

pub use mock::MockAdviceSource;
pub use openai::OpenAiAdviceSource;

/// Message returned when the ledger holds no trades; the upstream model is
/// never called in that case.
pub const NO_DATA_MESSAGE: &str =
    "トレードデータがありません。分析を開始するには、まずログを保存してください。";

/// Persona instruction sent as the system message. The coach is deliberately
/// harsh; the tone is part of the product.
pub const SYSTEM_PROMPT: &str = "貴様は超一流のFXトレーダーであり、新人トレーダーを育てる鬼コーチだ。口調は常にタメ口で、厳しく、遠慮がない。相手を突き放すような厳しい言葉で、本質的なアドバイスを叩き込む。感情的な慰めは一切不要。目標はただ一つ、トレーダーを本気で勝たせることだ。";

/// Advice source trait for turning a performance summary into a short
/// coaching message.
///
/// Implementations must handle retry/backoff and rate limiting.
#[async_trait]
pub trait AdviceSource: Send + Sync + fmt::Debug {
    /// Generate a coaching message from the summary and the most recent
    /// trades (newest last, at most a handful).
    async fn generate_advice(
        &self,
        summary: &Summary,
        recent_trades: &[ClosedTrade],
    ) -> Result<String, AdviceError>;
}

/// Error type for advice generation.
#[derive(Debug, Clone)]
pub enum AdviceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// API key missing or rejected
    NotConfigured,
}

impl fmt::Display for AdviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AdviceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            AdviceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AdviceError::RateLimited => write!(f, "Rate limited"),
            AdviceError::NotConfigured => write!(f, "Advice source is not configured"),
        }
    }
}

impl std::error::Error for AdviceError {}

/// Build the user prompt shared by all advice sources. Ratios that cannot be
/// computed (NaN or infinite) are rendered as 算出不能 rather than leaking
/// float formatting into the prompt.
pub fn build_prompt(summary: &Summary, recent_trades: &[ClosedTrade]) -> String {
    let recent_text = recent_trades
        .iter()
        .map(|t| {
            format!(
                "- Pips: {:.1}, 保有時間: {}",
                t.pips.unwrap_or(0.0),
                t.hold.as_deref().filter(|h| !h.is_empty()).unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let recent_section = if recent_text.is_empty() {
        "データなし".to_string()
    } else {
        recent_text
    };

    format!(
        "\
おい、新人。てめえのトレード結果だ、よく見やがれ。

### 総合成績
- トレード回数: {count}回
- 勝率: {win_rate:.1}%
- 合計獲得pips: {total_pips:.1} pips
- ペイオフレシオ: {payoff}
- 期待値/回: {expectancy} 円

### 直近のトレード（最大3件）
{recent}

### 指示
1.  まず、直近のトレード内容を分析しろ。特に、連敗していないか、損失が大きくなっていないか、無駄に短い時間でガチャガチャ取引していないか確認しろ。
2.  もし危険な兆候（3連敗、ロットを急に上げるなど）が見えたら、「おい、頭を冷やせ。30分PCから離れろ」「ロットを半分に落とせ」のように、具体的で強制力のある行動を命令しろ。
3.  直近に問題がなければ、総合成績を評価しろ。期待値がマイナスなら「そのやり方じゃ一生勝てねえぞ」と厳しく指摘し、改善点を一つだけ挙げろ。
4.  期待値がプラスでも、ペイオフレシオが1未満など、改善すべき点があれば指摘しろ。
5.  絶対に甘やかすな。慰めは不要だ。150字以内で、的を射た厳しい一言を叩きつけろ。
",
        count = summary.count,
        win_rate = summary.win_rate,
        total_pips = summary.total_pips,
        payoff = finite_or_unknown(summary.payoff),
        expectancy = finite_or_unknown(summary.expectancy_qty),
        recent = recent_section,
    )
}

fn finite_or_unknown(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "算出不能".to_string()
    }
}
