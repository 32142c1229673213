//! Excel生成
//!
//! シート構成: BOM（全行）/ Summary / Matched Items / Unmatched Items（Unmatched と Unavailable）

use super::layout::{
    Column, BOM_COLUMNS, SHEET_BOM, SHEET_MATCHED, SHEET_SUMMARY, SHEET_UNMATCHED, SUMMARY_COLUMNS,
};
use crate::error::{BomError, Result};
use rfp_bom_common::{BomSummary, MatchResult, MatchStatus};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// 次点候補の表示（"CODE (score); ..."）
pub fn format_alternatives(result: &MatchResult) -> String {
    result
        .alternatives
        .iter()
        .map(|a| format!("{} ({})", a.product_code, a.score))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Excelファイルを生成
pub fn generate_excel(results: &[MatchResult], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(results)
        .map_err(|e| BomError::ExcelGeneration(format!("ブック生成エラー: {}", e)))?;
    std::fs::write(output_path, buffer)
        .map_err(|e| BomError::ExcelGeneration(format!("保存エラー: {}", e)))?;
    Ok(())
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(results: &[MatchResult]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin);

    let summary = BomSummary::from_results(results);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_BOM)?;
    write_result_rows(sheet, results.iter(), &header_format)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_SUMMARY)?;
    write_summary(sheet, &summary, &header_format)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_MATCHED)?;
    write_result_rows(
        sheet,
        results.iter().filter(|r| r.status == MatchStatus::Matched),
        &header_format,
    )?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_UNMATCHED)?;
    write_result_rows(
        sheet,
        results
            .iter()
            .filter(|r| matches!(r.status, MatchStatus::Unmatched | MatchStatus::Unavailable)),
        &header_format,
    )?;

    workbook.save_to_buffer()
}

fn write_header(sheet: &mut Worksheet, columns: &[Column], format: &Format) -> std::result::Result<(), XlsxError> {
    for (i, column) in columns.iter().enumerate() {
        let col = i as u16;
        sheet.write_string_with_format(0, col, column.header, format)?;
        sheet.set_column_width(col, column.width)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_result_rows<'a>(
    sheet: &mut Worksheet,
    results: impl Iterator<Item = &'a MatchResult>,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    write_header(sheet, BOM_COLUMNS, header_format)?;

    for (i, r) in results.enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, r.line_number as f64)?;
        sheet.write_string(row, 1, r.rfp_text.as_str())?;
        sheet.write_string(row, 2, r.status.label())?;
        sheet.write_string(row, 3, r.confidence.map(|c| c.label()).unwrap_or(""))?;
        sheet.write_number(row, 4, r.score as f64)?;
        sheet.write_string(row, 5, r.product_code.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 6, r.description.as_deref().unwrap_or(""))?;
        if r.product_code.is_some() {
            sheet.write_number(row, 7, r.on_hand as f64)?;
        }
        if let Some(price) = r.unit_price {
            sheet.write_number(row, 8, price)?;
        }
        sheet.write_number(row, 9, r.candidates_considered as f64)?;
        sheet.write_string(row, 10, if r.hint_used { "yes" } else { "" })?;
        sheet.write_string(row, 11, format_alternatives(r))?;
        sheet.write_string(row, 12, r.reason.as_str())?;
    }

    Ok(())
}

fn write_summary(
    sheet: &mut Worksheet,
    summary: &BomSummary,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    write_header(sheet, SUMMARY_COLUMNS, header_format)?;

    let counts = [
        ("Total Items", summary.total),
        ("Matched", summary.matched),
        ("  High Confidence", summary.high_confidence),
        ("  Medium Confidence", summary.medium_confidence),
        ("  Low Confidence", summary.low_confidence),
        ("Unavailable (zero stock)", summary.unavailable),
        ("Unmatched", summary.unmatched),
        ("Errors", summary.errors),
    ];

    let mut row: u32 = 1;
    for (label, value) in counts {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, value as f64)?;
        row += 1;
    }

    let percent = Format::new().set_num_format("0.0\"%\"");
    sheet.write_string(row, 0, "Match Rate")?;
    sheet.write_number_with_format(row, 1, summary.match_rate(), &percent)?;
    row += 1;

    sheet.write_string(row, 0, "Generated")?;
    sheet.write_string(row, 1, chrono::Local::now().format("%Y-%m-%d %H:%M").to_string())?;

    Ok(())
}
