//! BOMシートの列レイアウト
//!
//! 列の並びと幅をここで一元管理し、全シートで共有する。

/// 列定義（見出し, 幅）
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

const fn col(header: &'static str, width: f64) -> Column {
    Column { header, width }
}

/// BOM / Matched Items / Unmatched Items シートの列
pub const BOM_COLUMNS: &[Column] = &[
    col("Line", 6.0),
    col("RFP Item", 48.0),
    col("Status", 12.0),
    col("Confidence", 11.0),
    col("Score", 7.0),
    col("Product Code", 18.0),
    col("Stock Description", 48.0),
    col("On Hand", 9.0),
    col("Unit Price", 10.0),
    col("Candidates", 11.0),
    col("Hint", 6.0),
    col("Alternatives", 40.0),
    col("Reason", 80.0),
];

/// Summary シートの列
pub const SUMMARY_COLUMNS: &[Column] = &[col("Metric", 28.0), col("Value", 14.0)];

/// シート名
pub const SHEET_BOM: &str = "BOM";
pub const SHEET_SUMMARY: &str = "Summary";
pub const SHEET_MATCHED: &str = "Matched Items";
pub const SHEET_UNMATCHED: &str = "Unmatched Items";
