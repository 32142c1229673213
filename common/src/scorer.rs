//! 重み付き類似度スコア
//!
//! バケットごとの類似度（完全一致 1.0 / それ以外は値の組の最大レーベンシュタイン類似度）を
//! ティアの重みで平均し、0〜100の整数に丸める。

use crate::bucket::{AttributeSet, Bucket};
use serde::Serialize;

/// バケット単位の類似度
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketScore {
    pub bucket: Bucket,
    pub similarity: f64,
}

impl BucketScore {
    pub fn is_exact(&self) -> bool {
        self.similarity >= 1.0
    }
}

/// スコア計算に参加するバケットの類似度（番号順）
///
/// 両側とも空のバケットは含めない。片側だけ空なら 0.0。
pub fn bucket_breakdown(rfp: &AttributeSet, candidate: &AttributeSet) -> Vec<BucketScore> {
    Bucket::ALL
        .into_iter()
        .filter(|b| rfp.has(*b) || candidate.has(*b))
        .map(|bucket| BucketScore {
            bucket,
            similarity: bucket_similarity(rfp, candidate, bucket),
        })
        .collect()
}

/// RFP属性と候補属性のスコア（0〜100）
///
/// 比較できるバケットが一つもない場合は 0。
pub fn score(rfp: &AttributeSet, candidate: &AttributeSet) -> u8 {
    let breakdown = bucket_breakdown(rfp, candidate);

    let total_weight: u32 = breakdown.iter().map(|s| s.bucket.weight()).sum();
    if total_weight == 0 {
        return 0;
    }

    let weighted: f64 = breakdown
        .iter()
        .map(|s| s.similarity * s.bucket.weight() as f64)
        .sum();

    let value = (100.0 * weighted / total_weight as f64).round();
    value.clamp(0.0, 100.0) as u8
}

fn bucket_similarity(rfp: &AttributeSet, candidate: &AttributeSet, bucket: Bucket) -> f64 {
    if !rfp.has(bucket) || !candidate.has(bucket) {
        return 0.0;
    }
    if rfp.get(bucket).any(|v| candidate.contains(bucket, v)) {
        return 1.0;
    }

    let mut best: f64 = 0.0;
    for a in rfp.get(bucket) {
        for b in candidate.get(bucket) {
            best = best.max(similarity(a, b));
        }
    }
    best
}

/// 正規化レーベンシュタイン類似度（0.0〜1.0、対称）
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());

    1.0 - (distance as f64 / max_len as f64)
}

/// レーベンシュタイン距離（2行DP）
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::extract_text;

    #[test]
    fn test_similarity_identity() {
        assert_eq!(similarity("seamless", "seamless"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("pipe", ""), 0.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [("a106b", "a106"), ("sch40", "sch80"), ("flange", "pipe")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_similarity_partial() {
        // a106b → a106 は削除1回
        let s = similarity("a106b", "a106");
        assert!((s - 0.8).abs() < 1e-9);
        let s = similarity("sch40", "sch80");
        assert!((s - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
    }

    #[test]
    fn test_identical_descriptions_score_100() {
        let rfp = extract_text("6\" SCH40 SMLS PIPE API 5L X52 PSL2\"");
        let cand = extract_text("6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2");
        assert_eq!(score(&rfp, &cand), 100);
    }

    #[test]
    fn test_one_sided_buckets_count_against() {
        // 一致13 / 分母18（ends=3, size1=1, misc=1 が片側のみ）
        let rfp = extract_text("4\" 150# WN FLANGE A105 SCH40");
        let cand = extract_text("150# WN FLANGE A105 SCH40 BW NACE");
        assert_eq!(score(&rfp, &cand), 72);
    }

    #[test]
    fn test_all_empty_scores_zero() {
        assert_eq!(score(&AttributeSet::new(), &AttributeSet::new()), 0);
        assert!(bucket_breakdown(&AttributeSet::new(), &AttributeSet::new()).is_empty());
    }

    #[test]
    fn test_unrelated_scores_low() {
        let rfp = extract_text("4\" 150# WNRF FLANGE A105");
        let cand = extract_text("6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2");
        assert!(score(&rfp, &cand) < 40);
    }

    #[test]
    fn test_adding_shared_value_never_decreases() {
        let cand = extract_text("6\" SCH40 SMLS PIPE A106 GR.B");
        let base = score(&extract_text("6\" PIPE"), &cand);
        let more = score(&extract_text("6\" PIPE SMLS"), &cand);
        let most = score(&extract_text("6\" PIPE SMLS SCH40"), &cand);
        assert!(more >= base);
        assert!(most >= more);
    }

    #[test]
    fn test_breakdown_marks_exact_buckets() {
        let rfp = extract_text("6\" SCH80 SMLS PIPE");
        let cand = extract_text("6\" SCH40 SMLS PIPE");
        let breakdown = bucket_breakdown(&rfp, &cand);
        let exact: Vec<_> = breakdown.iter().filter(|s| s.is_exact()).map(|s| s.bucket).collect();
        assert_eq!(exact, vec![Bucket::ItemGroup, Bucket::EndsFinish, Bucket::Size1]);
        let thickness = breakdown.iter().find(|s| s.bucket == Bucket::Thickness).unwrap();
        assert!((thickness.similarity - 0.8).abs() < 1e-9);
    }
}
