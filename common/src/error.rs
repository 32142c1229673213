//! エラー型定義

use thiserror::Error;

/// 照合エンジン共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 在庫マスタ未読込のまま照合が要求された
    #[error("stock master not loaded")]
    EmptyCatalog,

    /// 空のRFP行
    #[error("empty input: RFP line is blank")]
    EmptyInput,

    /// ヒントサービスのタイムアウト・失敗（照合はパターン抽出のみで続行する）
    #[error("hint service unavailable: {0}")]
    HintUnavailable(String),

    /// 同一読込内での品番重複（取込側の検証エラー）
    #[error("duplicate product code: {0}")]
    DuplicateProductCode(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
