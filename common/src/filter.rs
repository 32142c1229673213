//! ティア別候補絞り込み
//!
//! 全件から開始し、High → Medium → Low の順に絞り込む。
//! あるティアで候補が0件になる場合はそのティア全体を破棄し、直前の候補集合に戻す。

use crate::bucket::{AttributeSet, Tier};
use crate::catalog::CatalogIndex;
use serde::Serialize;
use std::collections::BTreeSet;

/// ティアごとの処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "action")]
pub enum TierAction {
    /// 絞り込みを適用した
    Applied { before: usize, after: usize },
    /// 候補が0件になるため破棄した
    Discarded,
    /// RFP側に値がなく何もしなかった
    Skipped,
}

impl TierAction {
    pub fn label(&self) -> &'static str {
        match self {
            TierAction::Applied { .. } => "applied",
            TierAction::Discarded => "discarded",
            TierAction::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierTrace {
    pub tier: Tier,
    #[serde(flatten)]
    pub action: TierAction,
}

/// 絞り込み結果（候補はマスタの読込順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pub candidates: Vec<usize>,
    pub trace: Vec<TierTrace>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// "high=applied, medium=discarded, low=skipped"
    pub fn trace_summary(&self) -> String {
        self.trace
            .iter()
            .map(|t| format!("{}={}", t.tier, t.action.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// RFP属性で候補を絞り込む
pub fn filter(rfp: &AttributeSet, index: &CatalogIndex) -> CandidateSet {
    let mut current: BTreeSet<usize> = (0..index.len()).collect();
    let mut trace = Vec::with_capacity(Tier::ORDERED.len());

    for tier in Tier::ORDERED {
        let before = current.len();
        let mut narrowed = current.clone();
        let mut touched = false;

        for bucket in tier.buckets().filter(|b| rfp.has(*b)) {
            touched = true;
            // バケット内は「いずれかの値を共有」= 値ごとの位置の和集合
            let sharing: BTreeSet<usize> = rfp
                .get(bucket)
                .flat_map(|value| index.positions(bucket, value).iter().copied())
                .collect();
            narrowed = narrowed.intersection(&sharing).copied().collect();
        }

        let action = if !touched {
            TierAction::Skipped
        } else if narrowed.is_empty() {
            TierAction::Discarded
        } else {
            let after = narrowed.len();
            current = narrowed;
            TierAction::Applied { before, after }
        };

        tracing::trace!(tier = %tier, action = action.label(), candidates = current.len(), "tier filtered");
        trace.push(TierTrace { tier, action });
    }

    CandidateSet {
        candidates: current.into_iter().collect(),
        trace,
    }
}
