//! 表形式ファイル読み込み
//!
//! CSV（引用符対応）と Excel/ODS（calamine、先頭シート）を
//! 文字列の行列として読み込む。在庫マスタとRFPの両方で使う。

use crate::error::{BomError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use regex::Regex;
use std::path::Path;

lazy_static::lazy_static! {
    static ref HEADER_SEPARATOR_RE: Regex = Regex::new(r"[\s\-]+").unwrap();
}

/// 対応する表形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(TableFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// ファイルを行列として読み込む（ヘッダー行を含む）
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(BomError::FileNotFound(path.display().to_string()));
    }

    match TableFormat::from_path(path) {
        Some(TableFormat::Csv) => {
            let content = std::fs::read_to_string(path)?;
            Ok(parse_csv(&content))
        }
        Some(TableFormat::Spreadsheet) => read_spreadsheet(path),
        None => Err(BomError::UnsupportedFormat(path.display().to_string())),
    }
}

/// CSV文字列を行列に変換
///
/// 空行は空の行（要素1つの空文字）として残す。
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content.lines().map(parse_csv_line).collect()
}

/// CSVの1行をフィールドに分割
///
/// 引用符内のカンマは区切りとみなさず、`""` は `"` に戻す。
/// フィールド途中の `"` はインチ記号としてそのまま残す（`6" PIPE`）。
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if in_quotes => in_quotes = false,
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());

    fields
}

/// ヘッダー名の正規化（trim・小文字・空白/ハイフン → `_`）
pub fn clean_header(header: &str) -> String {
    HEADER_SEPARATOR_RE
        .replace_all(header.trim().to_lowercase().as_str(), "_")
        .into_owned()
}

fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BomError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| BomError::ExcelRead(format!("シートがありません: {}", path.display())))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| BomError::ExcelRead(format!("{}: {}", sheet, e)))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// セルを文字列化（整数値の浮動小数は小数点なしで）
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
