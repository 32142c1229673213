use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rfp-bom")]
#[command(about = "RFP明細を在庫マスタと照合してBOMを生成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ヒントに使うAIプロバイダ (claude/codex/gemini)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// RFPファイルを在庫マスタと照合してBOMを出力
    Match {
        /// RFPファイル (.txt/.csv/.xlsx)
        #[arg(required = true)]
        rfp: PathBuf,

        /// 在庫マスタ (.csv/.xlsx)
        #[arg(short, long, required = true)]
        stock: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント/bom.*）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (excel/json/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// AIヒントを使用
        #[arg(long)]
        hints: bool,

        /// 次点候補数（省略時は設定ファイルの値）
        #[arg(long)]
        alternatives: Option<usize>,
    },

    /// 1行のテキストを正規化・バケット抽出して表示
    Inspect {
        /// RFP明細テキスト
        #[arg(required = true)]
        text: String,
    },

    /// 在庫マスタを読み込んで統計と検証結果を表示
    Stock {
        /// 在庫マスタ (.csv/.xlsx)
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ヒントプロバイダを設定 (claude/codex/gemini/none)
        #[arg(long)]
        set_provider: Option<String>,

        /// ヒントのタイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Json,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use excel, json, or both", s)),
        }
    }
}

/// `--set-provider` の値を解釈（"none" で解除）
pub fn parse_provider(s: &str) -> Result<Option<AiProvider>, String> {
    match s.to_lowercase().as_str() {
        "none" | "off" | "" => Ok(None),
        "claude" => Ok(Some(AiProvider::Claude)),
        "codex" => Ok(Some(AiProvider::Codex)),
        "gemini" => Ok(Some(AiProvider::Gemini)),
        _ => Err(format!("Unknown provider: {}. Use claude, codex, gemini, or none", s)),
    }
}
