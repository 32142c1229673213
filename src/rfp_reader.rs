//! RFP明細の読み込み
//!
//! 1始まりの行番号を安定させるため、空行・空セルも空の明細として残す
//! （照合側で Error 行になる）。

use crate::error::{BomError, Result};
use crate::tabular::{clean_header, read_rows, TableFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 品名列として優先するヘッダー名（正規化後）
const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "item_description",
    "material_description",
    "rfp_item",
    "item",
    "desc",
];

/// RFPの1明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfpLine {
    /// 1始まり
    pub line_number: usize,
    pub text: String,
}

/// テキストを1行1明細として読み込む
pub fn lines_from_text(content: &str) -> Vec<RfpLine> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .enumerate()
        .map(|(i, line)| RfpLine {
            line_number: i + 1,
            text: line.trim_end_matches('\r').to_string(),
        })
        .collect()
}

/// ヘッダー付きの行列から品名列を選んで明細にする
///
/// 品名列が見つからなければ、数値でない値が最も多い列を使う。
pub fn lines_from_rows(rows: Vec<Vec<String>>) -> Result<Vec<RfpLine>> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| BomError::InvalidRfp("ヘッダー行がありません".into()))?
        .iter()
        .map(|h| clean_header(h))
        .collect();
    let data: Vec<Vec<String>> = rows.collect();

    let column = DESCRIPTION_HEADERS
        .iter()
        .find_map(|name| header.iter().position(|h| h == name))
        .or_else(|| most_textual_column(header.len(), &data))
        .ok_or_else(|| BomError::InvalidRfp("品名列が見つかりません".into()))?;

    tracing::debug!(column = %header[column], rows = data.len(), "rfp description column selected");

    Ok(data
        .iter()
        .enumerate()
        .map(|(i, row)| RfpLine {
            line_number: i + 1,
            text: row.get(column).map(|s| s.trim().to_string()).unwrap_or_default(),
        })
        .collect())
}

fn most_textual_column(width: usize, data: &[Vec<String>]) -> Option<usize> {
    (0..width)
        .map(|col| {
            let textual = data
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|v| !v.trim().is_empty() && v.trim().parse::<f64>().is_err())
                .count();
            (col, textual)
        })
        .filter(|(_, textual)| *textual > 0)
        // 同数なら左の列
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(col, _)| col)
}

/// ファイルからRFP明細を読み込む（.txt/.csv/.xlsx）
pub fn load_rfp(path: &Path) -> Result<Vec<RfpLine>> {
    if !path.exists() {
        return Err(BomError::FileNotFound(path.display().to_string()));
    }

    let is_text = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    let lines = if is_text {
        lines_from_text(&std::fs::read_to_string(path)?)
    } else if TableFormat::from_path(path).is_some() {
        lines_from_rows(read_rows(path)?)?
    } else {
        return Err(BomError::UnsupportedFormat(path.display().to_string()));
    };

    tracing::info!(path = %path.display(), lines = lines.len(), "rfp loaded");
    Ok(lines)
}
