//! 照合エンジンの統合テスト
//!
//! 在庫マスタ取込 → 索引 → 一括照合までを通して検証

use rfp_bom_common::{
    extract_text, match_line, score, AttributeSet, Bucket, CatalogIndex, CatalogRecord,
    Confidence, MatchStatus, Result as CommonResult,
};
use rfp_bom_rust::catalog::CatalogStore;
use rfp_bom_rust::hint::{HintProvider, NoHints};
use rfp_bom_rust::matcher::{match_items, match_lines, MatchOptions};
use rfp_bom_rust::rfp_reader::{lines_from_text, load_rfp, RfpLine};
use std::time::Duration;
use tempfile::tempdir;

fn pipe_catalog() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::new(
            "PIPE-6-X52",
            "6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2",
            120,
        ),
        CatalogRecord::new("PIPE-6-B", "6\" SCH40 SMLS PIPE A106 GR.B", 40),
    ]
}

fn line(text: &str) -> RfpLine {
    RfpLine { line_number: 1, text: text.to_string() }
}

/// 同一品目の別表記は高信頼で一致する
#[test]
fn test_scenario_high_confidence_pipe() {
    let index = CatalogIndex::build(pipe_catalog());
    let r = match_line(1, "6\" SCH40 SMLS PIPE API 5L X52 PSL2\"", &index, None, 3);

    assert_eq!(r.status, MatchStatus::Matched);
    assert_eq!(r.confidence, Some(Confidence::High));
    assert!(r.score >= 80);
    assert_eq!(r.product_code.as_deref(), Some("PIPE-6-X52"));
}

/// フランジのない在庫ではフランジ明細は不一致
#[test]
fn test_scenario_flange_against_pipe_only_catalog() {
    let index = CatalogIndex::build(pipe_catalog());
    let r = match_line(1, "4\" 150# WNRF FLANGE A105", &index, None, 3);

    assert_eq!(r.status, MatchStatus::Unmatched);
    assert!(r.score < 40);
    assert!(r.product_code.is_none());
    assert!(r.description.is_none());
}

/// 在庫0の一致は在庫切れ（品番とスコアは残る）
#[test]
fn test_scenario_zero_stock_is_unavailable() {
    let index = CatalogIndex::build(vec![CatalogRecord::new(
        "FLG-4-WN",
        "150# WN FLANGE A105 SCH40 BW NACE",
        0,
    )]);
    let r = match_line(7, "4\" 150# WN FLANGE A105 SCH40", &index, None, 3);

    assert_eq!(r.status, MatchStatus::Unavailable);
    assert_eq!(r.product_code.as_deref(), Some("FLG-4-WN"));
    assert_eq!(r.score, 72);
    assert!(r.reason.contains("on-hand quantity is 0"));
}

/// 空行はエラー行になり、他の行の照合は続く
#[test]
fn test_scenario_blank_line_is_error() {
    let index = CatalogIndex::build(pipe_catalog());
    let lines = lines_from_text("6\" SCH40 SMLS PIPE\n\n6\" SCH40 SMLS PIPE API 5L X52\n");
    let results = match_lines(&index, &lines, &[], 3);

    assert_eq!(results.len(), 3);
    assert_eq!(results[1].status, MatchStatus::Error);
    assert!(results[1].reason.contains("empty input"));
    assert!(results[1].product_code.is_none());
    assert_eq!(results[0].status, MatchStatus::Matched);
    assert_eq!(results[2].status, MatchStatus::Matched);
}

/// 同点なら在庫マスタで先に現れた品目を選ぶ
#[test]
fn test_scenario_tie_prefers_earlier_record() {
    // 材質だけが在庫側にある: 11 / 13 → 85
    let index = CatalogIndex::build(vec![
        CatalogRecord::new("FLG-A", "150# FLANGE BW SCH40 A105", 3),
        CatalogRecord::new("FLG-B", "150# FLANGE BW SCH40 A105", 9),
    ]);
    let r = match_line(1, "150# FLANGE BW SCH40", &index, None, 3);

    assert_eq!(r.status, MatchStatus::Matched);
    assert_eq!(r.score, 85);
    assert_eq!(r.confidence, Some(Confidence::High));
    assert_eq!(r.product_code.as_deref(), Some("FLG-A"));
    assert_eq!(r.alternatives.len(), 1);
    assert_eq!(r.alternatives[0].product_code, "FLG-B");
    assert_eq!(r.alternatives[0].score, r.score);
}

/// 呼び径の数字や数量は角度として拾わない
#[test]
fn test_scenario_size_and_quantity_numbers_keep_full_score() {
    let index = CatalogIndex::build(vec![
        CatalogRecord::new("PIPE-3H", "3.1/2\" SCH40 SMLS PIPE", 4),
        CatalogRecord::new("PIPE-2", "2\" SCH40 SMLS PIPE", 4),
    ]);

    let r = match_line(1, "DN 90 SCH40 SMLS PIPE", &index, None, 3);
    assert_eq!(r.product_code.as_deref(), Some("PIPE-3H"));
    assert_eq!(r.score, 100);

    let r = match_line(2, "2\" SCH40 SMLS PIPE QTY 90", &index, None, 3);
    assert_eq!(r.product_code.as_deref(), Some("PIPE-2"));
    assert_eq!(r.score, 100);
}

/// インチ肉厚は2径目にならない
#[test]
fn test_scenario_inch_wall_thickness_is_not_a_reducer() {
    let index = CatalogIndex::build(vec![
        CatalogRecord::new("RED-6X0", "6\" x 0.28\" REDUCER", 1),
        CatalogRecord::new("PIPE-6", "6\" SCH40 PIPE 0.280\" WT", 2),
    ]);
    let r = match_line(1, "6\" SCH40 PIPE 0.280\" WT", &index, None, 3);

    assert_eq!(r.product_code.as_deref(), Some("PIPE-6"));
    assert_eq!(r.score, 100);
}

/// 同じ入力は常に同じ結果
#[test]
fn test_matching_is_deterministic() {
    let index = CatalogIndex::build(pipe_catalog());
    let lines = lines_from_text("6\" SCH40 SMLS PIPE\n4\" 150# WNRF FLANGE A105\n6in PIPE X52\n");

    let first = match_lines(&index, &lines, &[], 3);
    for _ in 0..5 {
        assert_eq!(match_lines(&index, &lines, &[], 3), first);
    }
}

/// 共有する値を増やしてもスコアは下がらない
#[test]
fn test_shared_attributes_never_decrease_score() {
    let candidate = extract_text("6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2");
    let texts = ["6\" PIPE", "6\" PIPE X52", "6\" PIPE X52 PSL2", "6\" PIPE X52 PSL2 SCH40"];

    let scores: Vec<u8> = texts.iter().map(|t| score(&extract_text(t), &candidate)).collect();
    assert!(scores.windows(2).all(|w| w[1] >= w[0]), "{:?}", scores);
}

/// ティアで候補が空になる場合は絞り込みを戻して全件で採点する
#[test]
fn test_tier_filter_falls_back_instead_of_emptying() {
    let index = CatalogIndex::build(pipe_catalog());
    // "tee" に一致する品目はない
    let r = match_line(1, "6\" SCH40 TEE", &index, None, 3);

    assert_eq!(r.candidates_considered, 2);
    assert!(r.reason.contains("high=discarded"));
}

/// ヒントは抽出値に足されるだけで、抽出値を消さない
#[test]
fn test_hint_adds_values() {
    let index = CatalogIndex::build(pipe_catalog());
    let hint = AttributeSet::from_pairs(&[(Bucket::Material, "x52")]);

    let without = match_line(1, "6\" SCH40 SMLS PIPE", &index, None, 3);
    let with = match_line(1, "6\" SCH40 SMLS PIPE", &index, Some(&hint), 3);

    assert_eq!(without.product_code.as_deref(), Some("PIPE-6-B"));
    assert_eq!(with.product_code.as_deref(), Some("PIPE-6-X52"));
    assert!(with.hint_used);
}

struct SlowHints;

impl HintProvider for SlowHints {
    async fn interpret(&self, _text: &str) -> CommonResult<Option<AttributeSet>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Some(AttributeSet::from_pairs(&[(Bucket::Material, "x52")])))
    }
}

/// ヒントがタイムアウトしてもヒントなしと同じ結果で完了する
#[tokio::test]
async fn test_hint_timeout_falls_back_to_extraction() {
    let store = CatalogStore::new();
    store.replace(pipe_catalog());
    let lines = vec![line("6\" SCH40 SMLS PIPE")];

    let options = MatchOptions {
        hint_timeout: Duration::from_millis(50),
        ..MatchOptions::default()
    };

    let slow = match_items(&store, &lines, &SlowHints, &options).await.unwrap();
    let none = match_items(&store, &lines, &NoHints, &options).await.unwrap();

    assert_eq!(slow, none);
    assert!(!slow[0].hint_used);
}

/// 差し替え前に取ったスナップショットは古い索引のまま使える
#[test]
fn test_store_swap_keeps_old_snapshot() {
    let store = CatalogStore::new();
    store.replace(pipe_catalog());
    let before = store.snapshot().unwrap();

    store.replace(vec![CatalogRecord::new("CAP-4", "4\" CAP", 1)]);
    let after = store.snapshot().unwrap();

    assert_eq!(before.len(), 2);
    assert_eq!(after.len(), 1);
    assert!(before.find_by_code("PIPE-6-B").is_some());
    assert!(after.find_by_code("PIPE-6-B").is_none());
}

/// ファイルから読み込んで一括照合する
#[tokio::test]
async fn test_match_from_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let stock_path = dir.path().join("stock.csv");
    let rfp_path = dir.path().join("rfp.txt");

    std::fs::write(
        &stock_path,
        "prd_code,prd_desc1,onhand\n\
         PIPE-6-X52,6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2,120\n\
         FLG-4-WN,150# WN FLANGE A105 SCH40 BW NACE,0\n",
    )
    .unwrap();
    std::fs::write(
        &rfp_path,
        "6\" SCH40 SMLS PIPE API 5L X52 PSL2\"\n\n4\" 150# WN FLANGE A105 SCH40\n",
    )
    .unwrap();

    let store = CatalogStore::new();
    let report = store.load(&stock_path).unwrap();
    assert_eq!(report.accepted, 2);

    let lines = load_rfp(&rfp_path).unwrap();
    let results = match_items(&store, &lines, &NoHints, &MatchOptions::default())
        .await
        .unwrap();

    let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![MatchStatus::Matched, MatchStatus::Error, MatchStatus::Unavailable]
    );
}
