use thiserror::Error;

#[derive(Error, Debug)]
pub enum BomError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式: {0}")]
    UnsupportedFormat(String),

    #[error("在庫マスタが不正: {0}")]
    InvalidStockMaster(String),

    #[error("RFPファイルが不正: {0}")]
    InvalidRfp(String),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("照合タスクエラー: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Common(#[from] rfp_bom_common::Error),
}

pub type Result<T> = std::result::Result<T, BomError>;
