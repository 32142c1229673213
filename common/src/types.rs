//! 照合結果の型定義
//!
//! - MatchStatus / Confidence: 分類結果
//! - MatchResult: RFP 1行ぶんの照合結果（BOMの1行）
//! - BomSummary: 結果全体の集計

use serde::{Deserialize, Serialize};

/// 照合ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Matched,
    Unmatched,
    /// 一致したが在庫0
    Unavailable,
    /// 空行・マスタ未読込
    Error,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Matched => "Matched",
            MatchStatus::Unmatched => "Unmatched",
            MatchStatus::Unavailable => "Unavailable",
            MatchStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 一致の信頼度（Matched帯のスコアにのみ付く）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 次点候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub product_code: String,
    pub description: String,
    pub score: u8,
    pub on_hand: u64,
}

/// RFP 1行の照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// 1始まりの行番号
    pub line_number: usize,
    pub rfp_text: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub score: u8,
    pub reason: String,
    #[serde(default)]
    pub on_hand: u64,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub candidates_considered: usize,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub hint_used: bool,
}

impl MatchResult {
    /// Error 行（後続の処理をすべて省略した結果）
    pub fn error(line_number: usize, rfp_text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line_number,
            rfp_text: rfp_text.into(),
            status: MatchStatus::Error,
            confidence: None,
            product_code: None,
            description: None,
            score: 0,
            reason: reason.into(),
            on_hand: 0,
            unit_price: None,
            candidates_considered: 0,
            alternatives: Vec::new(),
            hint_used: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }
}

/// 照合結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub unavailable: usize,
    pub errors: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
}

impl BomSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = BomSummary {
            total: results.len(),
            ..Default::default()
        };

        for result in results {
            match result.status {
                MatchStatus::Matched => {
                    summary.matched += 1;
                    match result.confidence {
                        Some(Confidence::High) => summary.high_confidence += 1,
                        Some(Confidence::Medium) => summary.medium_confidence += 1,
                        Some(Confidence::Low) => summary.low_confidence += 1,
                        None => {}
                    }
                }
                MatchStatus::Unmatched => summary.unmatched += 1,
                MatchStatus::Unavailable => summary.unavailable += 1,
                MatchStatus::Error => summary.errors += 1,
            }
        }

        summary
    }

    /// 全体に対する割合（%）。0件なら 0.0
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }

    pub fn match_rate(&self) -> f64 {
        self.percent(self.matched)
    }
}
