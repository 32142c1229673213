//! RFP 1行の照合
//!
//! 正規化 → 抽出 → ヒントのマージ → 絞り込み → スコア → 分類 の順に処理する。
//! 行ごとに独立しており、索引は読み取りのみ。

use crate::bucket::AttributeSet;
use crate::catalog::CatalogIndex;
use crate::classifier::classify;
use crate::error::Error;
use crate::filter::filter;
use crate::normalizer::normalize;
use crate::rules::extract;
use crate::scorer::{bucket_breakdown, score};
use crate::types::{Alternative, MatchResult};

/// 既定の次点候補数
pub const DEFAULT_ALTERNATIVES: usize = 3;

/// 最高スコアの候補を選ぶ（同点は先に現れた方）
///
/// `scored` はマスタの読込順に並んでいること。
pub fn pick_best(scored: &[(usize, u8)]) -> Option<(usize, u8)> {
    let mut best: Option<(usize, u8)> = None;
    for &(position, s) in scored {
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((position, s)),
        }
    }
    best
}

/// RFP 1行を照合する
///
/// 空行とマスタ未読込は Error 行として返し、以降の処理は行わない。
/// ヒントはバケット単位の和集合でマージし、抽出値を上書きしない。
pub fn match_line(
    line_number: usize,
    text: &str,
    index: &CatalogIndex,
    hint: Option<&AttributeSet>,
    alternatives: usize,
) -> MatchResult {
    if text.trim().is_empty() {
        return MatchResult::error(line_number, text, Error::EmptyInput.to_string());
    }
    if index.is_empty() {
        return MatchResult::error(line_number, text, Error::EmptyCatalog.to_string());
    }

    let extracted = extract(&normalize(text));
    let (rfp, hint_used) = match hint {
        Some(h) if !h.is_empty() => (extracted.union(h), true),
        _ => (extracted, false),
    };

    let candidates = filter(&rfp, index);
    let scored: Vec<(usize, u8)> = candidates
        .candidates
        .iter()
        .filter_map(|&i| index.get(i).map(|r| (i, score(&rfp, &r.attributes))))
        .collect();

    let best = pick_best(&scored).and_then(|(i, s)| index.get(i).map(|r| (i, r, s)));
    let best_score = best.map(|(_, _, s)| s).unwrap_or(0);
    let breakdown = best
        .map(|(_, r, _)| bucket_breakdown(&rfp, &r.attributes))
        .unwrap_or_default();
    let classification = classify(best.map(|(_, r, _)| r), best_score, &candidates, &breakdown);

    tracing::debug!(
        line = line_number,
        status = %classification.status,
        score = best_score,
        candidates = candidates.len(),
        "line matched"
    );

    let mut ranked: Vec<(usize, u8)> = scored
        .iter()
        .copied()
        .filter(|&(i, s)| s > 0 && Some(i) != best.map(|(b, _, _)| b))
        .collect();
    // 安定ソートなので同点は読込順のまま
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let alternatives: Vec<Alternative> = ranked
        .into_iter()
        .take(alternatives)
        .filter_map(|(i, s)| {
            index.get(i).map(|r| Alternative {
                product_code: r.product_code.clone(),
                description: r.description.clone(),
                score: s,
                on_hand: r.on_hand,
            })
        })
        .collect();

    // Unmatched は品番・品名を持たない
    let matched = best
        .map(|(_, r, _)| r)
        .filter(|_| classification.confidence.is_some());

    MatchResult {
        line_number,
        rfp_text: text.to_string(),
        status: classification.status,
        confidence: classification.confidence,
        product_code: matched.map(|r| r.product_code.clone()),
        description: matched.map(|r| r.description.clone()),
        score: best_score,
        reason: classification.reason,
        on_hand: matched.map(|r| r.on_hand).unwrap_or(0),
        unit_price: matched.and_then(|r| r.unit_price),
        candidates_considered: candidates.len(),
        alternatives,
        hint_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Bucket;
    use crate::catalog::CatalogRecord;
    use crate::types::{Confidence, MatchStatus};

    fn index() -> CatalogIndex {
        CatalogIndex::build(vec![
            CatalogRecord::new(
                "PIPE-6-X52",
                "6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2",
                120,
            )
            .with_unit_price(85.0),
            CatalogRecord::new("PIPE-6-B", "6\" SCH40 SMLS PIPE A106 GR.B", 40),
            CatalogRecord::new("FLG-4-WN", "150# WN FLANGE A105 SCH40 BW NACE", 0),
        ])
    }

    #[test]
    fn test_pick_best_first_wins_ties() {
        assert_eq!(pick_best(&[(0, 85), (1, 85)]), Some((0, 85)));
        assert_eq!(pick_best(&[(0, 70), (1, 85), (2, 85)]), Some((1, 85)));
        assert_eq!(pick_best(&[]), None);
    }

    #[test]
    fn test_high_confidence_match() {
        let r = match_line(1, "6\" SCH40 SMLS PIPE API 5L X52 PSL2\"", &index(), None, 3);
        assert_eq!(r.status, MatchStatus::Matched);
        assert_eq!(r.confidence, Some(Confidence::High));
        assert_eq!(r.product_code.as_deref(), Some("PIPE-6-X52"));
        assert_eq!(r.score, 100);
        assert_eq!(r.on_hand, 120);
        assert_eq!(r.unit_price, Some(85.0));
        assert!(!r.hint_used);
    }

    #[test]
    fn test_zero_stock_is_unavailable() {
        let r = match_line(2, "4\" 150# WN FLANGE A105 SCH40", &index(), None, 3);
        assert_eq!(r.status, MatchStatus::Unavailable);
        assert_eq!(r.product_code.as_deref(), Some("FLG-4-WN"));
        assert_eq!(r.score, 72);
        assert_eq!(r.on_hand, 0);
    }

    #[test]
    fn test_blank_line_is_error() {
        let r = match_line(3, "   ", &index(), None, 3);
        assert_eq!(r.status, MatchStatus::Error);
        assert!(r.reason.contains("empty input"));
        assert!(r.product_code.is_none());
    }

    #[test]
    fn test_empty_catalog_is_error() {
        let r = match_line(1, "6\" PIPE", &CatalogIndex::default(), None, 3);
        assert_eq!(r.status, MatchStatus::Error);
        assert_eq!(r.reason, "stock master not loaded");
    }

    #[test]
    fn test_alternatives_exclude_best() {
        // X52 側は材質（片側のみ）と Misc が分母に入るので 75、A106 側は 82
        let r = match_line(1, "6\" SCH40 SMLS PIPE", &index(), None, 3);
        assert_eq!(r.product_code.as_deref(), Some("PIPE-6-B"));
        assert_eq!(r.score, 82);
        assert_eq!(r.candidates_considered, 2);
        assert_eq!(r.alternatives.len(), 1);
        assert_eq!(r.alternatives[0].product_code, "PIPE-6-X52");
        assert_eq!(r.alternatives[0].score, 75);

        let none = match_line(1, "6\" SCH40 SMLS PIPE", &index(), None, 0);
        assert!(none.alternatives.is_empty());
    }

    #[test]
    fn test_hint_is_merged_not_overriding() {
        let hint = AttributeSet::from_pairs(&[(Bucket::Material, "x52")]);
        let r = match_line(1, "6\" SCH40 SMLS PIPE", &index(), Some(&hint), 3);
        assert!(r.hint_used);
        assert_eq!(r.product_code.as_deref(), Some("PIPE-6-X52"));
        assert_eq!(r.score, 92);

        let empty = AttributeSet::new();
        let r = match_line(1, "6\" SCH40 SMLS PIPE", &index(), Some(&empty), 3);
        assert!(!r.hint_used);
    }
}
