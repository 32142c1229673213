//! スコア → ステータス分類
//!
//! | スコア | 結果 |
//! |--------|------|
//! | 80以上 | Matched / High |
//! | 60〜79 | Matched / Medium |
//! | 40〜59 | Matched / Low |
//! | 40未満・候補なし | Unmatched |
//!
//! Matched でも在庫数が0なら Unavailable（品番・スコアは保持）。

use crate::catalog::CatalogRecord;
use crate::filter::CandidateSet;
use crate::scorer::BucketScore;
use crate::types::{Confidence, MatchStatus};

pub const HIGH_THRESHOLD: u8 = 80;
pub const MEDIUM_THRESHOLD: u8 = 60;
pub const LOW_THRESHOLD: u8 = 40;

/// 分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: MatchStatus,
    pub confidence: Option<Confidence>,
    pub reason: String,
}

/// スコア帯の信頼度（40未満は None）
pub fn confidence_for(score: u8) -> Option<Confidence> {
    if score >= HIGH_THRESHOLD {
        Some(Confidence::High)
    } else if score >= MEDIUM_THRESHOLD {
        Some(Confidence::Medium)
    } else if score >= LOW_THRESHOLD {
        Some(Confidence::Low)
    } else {
        None
    }
}

fn threshold_of(confidence: Confidence) -> u8 {
    match confidence {
        Confidence::High => HIGH_THRESHOLD,
        Confidence::Medium => MEDIUM_THRESHOLD,
        Confidence::Low => LOW_THRESHOLD,
    }
}

/// 最良候補とスコアを分類し、判定経路から理由文を組み立てる
pub fn classify(
    best: Option<&CatalogRecord>,
    score: u8,
    candidates: &CandidateSet,
    breakdown: &[BucketScore],
) -> Classification {
    let tiers = format!("tiers: {}", candidates.trace_summary());

    let (record, confidence) = match (best, confidence_for(score)) {
        (Some(record), Some(confidence)) => (record, confidence),
        (None, _) => {
            return Classification {
                status: MatchStatus::Unmatched,
                confidence: None,
                reason: format!("No candidate in stock master; {}", tiers),
            };
        }
        (Some(_), None) => {
            return Classification {
                status: MatchStatus::Unmatched,
                confidence: None,
                reason: format!(
                    "No candidate reached the match threshold (best score {} < {}); {}",
                    score, LOW_THRESHOLD, tiers
                ),
            };
        }
    };

    let exact: Vec<&str> = breakdown
        .iter()
        .filter(|s| s.is_exact())
        .map(|s| s.bucket.label())
        .collect();
    let exact = if exact.is_empty() {
        "none".to_string()
    } else {
        exact.join(", ")
    };

    let mut reason = format!(
        "{} confidence match (score {} >= {}); {}; exact buckets: {}",
        confidence,
        score,
        threshold_of(confidence),
        tiers,
        exact
    );

    let status = if record.on_hand == 0 {
        reason.push_str("; on-hand quantity is 0");
        MatchStatus::Unavailable
    } else {
        MatchStatus::Matched
    };

    Classification {
        status,
        confidence: Some(confidence),
        reason,
    }
}
