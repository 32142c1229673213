//! RFP一括照合
//!
//! 1. 在庫マスタ索引のスナップショット取得（未読込なら拒否）
//! 2. ヒント取得（任意・同時実行数と時間を制限）
//! 3. rayon で各行を並列照合し、行番号順に並べる

use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::error::Result;
use crate::hint::{fetch_hint, HintProvider};
use crate::rfp_reader::RfpLine;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rfp_bom_common::{match_line, AttributeSet, BomSummary, CatalogIndex, MatchResult};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub alternatives: usize,
    pub hint_timeout: Duration,
    pub hint_concurrency: usize,
    /// ヒント取得中に進捗バーを表示する
    pub show_progress: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            alternatives: config.alternatives,
            hint_timeout: config.hint_timeout(),
            hint_concurrency: config.hint_concurrency.max(1),
            show_progress: false,
        }
    }
}

/// 全明細のヒントを取得する（結果は明細と同じ順）
pub async fn collect_hints<P: HintProvider>(
    provider: &P,
    lines: &[RfpLine],
    options: &MatchOptions,
) -> Vec<Option<AttributeSet>> {
    let progress = if options.show_progress {
        let pb = ProgressBar::new(lines.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  ヒント取得 [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let timeout = options.hint_timeout;
    let hints = stream::iter(lines.iter().map(|line| {
        let pb = progress.clone();
        async move {
            let hint = fetch_hint(provider, line, timeout).await;
            pb.inc(1);
            hint
        }
    }))
    .buffered(options.hint_concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    progress.finish_and_clear();

    let received = hints.iter().filter(|h| h.is_some()).count();
    tracing::info!(lines = lines.len(), received, "hints collected");
    hints
}

/// 索引に対して全明細を並列照合する
///
/// `hints` は明細と同じ順（足りない分はヒントなし）。
pub fn match_lines(
    index: &CatalogIndex,
    lines: &[RfpLine],
    hints: &[Option<AttributeSet>],
    alternatives: usize,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = lines
        .par_iter()
        .enumerate()
        .map(|(i, line)| {
            let hint = hints.get(i).and_then(|h| h.as_ref());
            match_line(line.line_number, &line.text, index, hint, alternatives)
        })
        .collect();

    results.sort_by_key(|r| r.line_number);
    results
}

/// 一括照合
///
/// 在庫マスタが未読込・空の場合は `EmptyCatalog` で要求全体を拒否する。
pub async fn match_items<P: HintProvider>(
    store: &CatalogStore,
    lines: &[RfpLine],
    provider: &P,
    options: &MatchOptions,
) -> Result<Vec<MatchResult>> {
    let index = store.snapshot()?;

    let hints = collect_hints(provider, lines, options).await;

    // 採点はCPU処理なのでランタイムのワーカーを塞がない
    let owned_lines = lines.to_vec();
    let alternatives = options.alternatives;
    let results = tokio::task::spawn_blocking(move || {
        match_lines(&index, &owned_lines, &hints, alternatives)
    })
    .await?;

    let summary = BomSummary::from_results(&results);
    tracing::info!(
        total = summary.total,
        matched = summary.matched,
        unavailable = summary.unavailable,
        unmatched = summary.unmatched,
        errors = summary.errors,
        "batch matched"
    );

    Ok(results)
}
