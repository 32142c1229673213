use anyhow::Context;
use clap::Parser;
use rfp_bom_common::{extract, normalize, BomSummary, Bucket, MatchResult, MatchStatus};
use rfp_bom_rust::{catalog, cli, config, export, hint, matcher, rfp_reader, stock_master};
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;

    if let Some(threads) = config.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            tracing::warn!(error = %e, "thread pool already initialized");
        }
    }

    match cli.command {
        Commands::Match { rfp, stock, output, format, hints, alternatives } => {
            println!("📋 rfp-bom - BOM照合\n");

            // 1. 在庫マスタ
            println!("[1/4] 在庫マスタを読み込み中...");
            let store = catalog::CatalogStore::new();
            let report = store
                .load(&stock)
                .with_context(|| format!("在庫マスタを読み込めません: {}", stock.display()))?;
            println!("✔ {}件の在庫品目を登録", report.accepted);
            print_ingest_warnings(&report);
            println!();

            // 2. RFP
            println!("[2/4] RFPを読み込み中...");
            let lines = rfp_reader::load_rfp(&rfp)
                .with_context(|| format!("RFPを読み込めません: {}", rfp.display()))?;
            println!("✔ {}行の明細を検出\n", lines.len());

            // 3. 照合
            let mut options = matcher::MatchOptions::from_config(&config);
            options.show_progress = true;
            if let Some(n) = alternatives {
                options.alternatives = n;
            }

            let provider = if hints { cli.ai_provider.or(config.hint_provider) } else { None };
            let results = match provider {
                Some(provider) => {
                    println!("[3/4] 照合中... (ヒント: {})", provider);
                    let provider = hint::CliHintProvider::new(provider);
                    matcher::match_items(&store, &lines, &provider, &options).await?
                }
                None => {
                    if hints {
                        println!("⚠ ヒントプロバイダが未設定のため、ヒントなしで照合します");
                    }
                    println!("[3/4] 照合中...");
                    matcher::match_items(&store, &lines, &hint::NoHints, &options).await?
                }
            };
            println!("✔ 照合完了\n");

            // 4. 出力
            println!("[4/4] 結果を出力中...");
            let output = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let stem = rfp
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| format!("{}_bom", s))
                .unwrap_or_else(|| "bom".to_string());
            for path in export::export_results(&results, format, &output, &stem)? {
                println!("✔ 出力: {}", path.display());
            }

            print_summary(&results);
            println!("\n✅ 完了");
        }

        Commands::Inspect { text } => {
            let normalized = normalize(&text);
            let attributes = extract(&normalized);

            println!("入力:   {}", text);
            println!("正規化: {}", normalized.as_str());
            println!();
            for bucket in Bucket::ALL {
                let values: Vec<_> = attributes.get(bucket).collect();
                println!(
                    "  [{:>2}] {:<18} {:<6} {}",
                    bucket.number(),
                    bucket.label(),
                    bucket.tier(),
                    if values.is_empty() { "-".to_string() } else { values.join(", ") }
                );
            }
        }

        Commands::Stock { file } => {
            println!("📦 rfp-bom - 在庫マスタ検証\n");

            let master = stock_master::load_stock_master(&file)
                .with_context(|| format!("在庫マスタを読み込めません: {}", file.display()))?;
            let report = &master.report;

            println!("列: {}", report.columns_found.join(", "));
            for (field, column) in &report.mapped_columns {
                println!("  {:?} <- {}", field, column);
            }
            println!();
            println!("データ行: {}", report.original_rows);
            println!("登録:     {}", report.accepted);
            print_ingest_warnings(report);

            let store = catalog::CatalogStore::new();
            let index = store.replace(master.records);
            let stats = index.stats();
            println!();
            println!("在庫0:     {}", stats.zero_stock);
            println!("品名なし:  {}", stats.missing_description);
            println!("バケット別の値の種類:");
            for (bucket, count) in &stats.distinct_values {
                println!("  {:<18} {}", bucket.label(), count);
            }
        }

        Commands::Config { show, set_provider, set_timeout } => {
            let mut config = config;

            if let Some(value) = set_provider {
                let provider = cli::parse_provider(&value).map_err(anyhow::Error::msg)?;
                config.set_hint_provider(provider)?;
                println!("✔ ヒントプロバイダを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_hint_timeout(seconds)?;
                println!("✔ ヒントのタイムアウトを{}秒に設定しました", seconds);
            }

            if show {
                println!("設定 ({}):", Config::config_path()?.display());
                println!(
                    "  ヒントプロバイダ: {}",
                    config.hint_provider.map(|p| p.to_string()).unwrap_or_else(|| "未設定".to_string())
                );
                println!("  タイムアウト:     {}秒", config.hint_timeout().as_secs());
                println!("  同時実行数:       {}", config.hint_concurrency);
                println!("  次点候補数:       {}", config.alternatives);
                println!(
                    "  スレッド数:       {}",
                    config.threads.map(|n| n.to_string()).unwrap_or_else(|| "自動".to_string())
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_ingest_warnings(report: &stock_master::IngestReport) {
    if !report.skipped_rows.is_empty() {
        println!("⚠ 空行として{}行を読み飛ばしました", report.skipped_rows.len());
    }
    if report.generated_codes > 0 {
        println!("⚠ 品番のない{}行に品番を割り当てました", report.generated_codes);
    }
    if report.invalid_quantities > 0 {
        println!("⚠ 数量を解釈できない{}行を在庫0としました", report.invalid_quantities);
    }
}

fn print_summary(results: &[MatchResult]) {
    let summary = BomSummary::from_results(results);

    println!("\n集計:");
    println!("  明細:       {}", summary.total);
    println!("  一致:       {} ({:.1}%)", summary.matched, summary.match_rate());
    println!(
        "    高/中/低: {}/{}/{}",
        summary.high_confidence, summary.medium_confidence, summary.low_confidence
    );
    println!("  在庫切れ:   {}", summary.unavailable);
    println!("  不一致:     {}", summary.unmatched);
    println!("  エラー:     {}", summary.errors);

    for result in results.iter().filter(|r| r.status == MatchStatus::Error) {
        println!("  ✗ {}行目: {}", result.line_number, result.reason);
    }
}
