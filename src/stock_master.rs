//! 在庫マスタ取込
//!
//! ヘッダー名を別名表で標準フィールドに割り当て、行を `CatalogRecord` に変換する。
//! 品番の重複はここで検出してエラーにする（照合エンジンは重複を検査しない）。

use crate::error::{BomError, Result};
use crate::tabular::{clean_header, read_rows};
use rfp_bom_common::CatalogRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// 標準フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockField {
    ProductCode,
    Description,
    OnHand,
    UnitPrice,
    Unit,
}

impl StockField {
    pub const ALL: [StockField; 5] = [
        StockField::ProductCode,
        StockField::Description,
        StockField::OnHand,
        StockField::UnitPrice,
        StockField::Unit,
    ];

    /// 受け付けるヘッダー名（正規化後、優先順）
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StockField::ProductCode => &[
                "prd_code", "product_code", "item_code", "code", "part_number", "part_no",
                "partno", "item_no", "itemno", "product_id",
            ],
            StockField::Description => &[
                "prd_desc1", "maindesc", "description", "item_description", "desc",
                "product_description", "item_desc", "product_desc", "name", "item_name",
            ],
            StockField::OnHand => &[
                "onhand", "on_hand", "on_hand_quantity", "quantity", "qty", "stock_qty",
                "available_qty", "stock", "inventory", "balance",
            ],
            StockField::UnitPrice => &["unit_price", "price", "cost", "rate", "unit_cost"],
            StockField::Unit => &["uom", "unit", "unit_of_measure", "units"],
        }
    }
}

/// 取込結果の報告
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// ヘッダーを除くデータ行数
    pub original_rows: usize,
    pub accepted: usize,
    /// 品番・品名ともに空で読み飛ばした行（1始まりのデータ行番号）
    pub skipped_rows: Vec<usize>,
    pub columns_found: Vec<String>,
    pub mapped_columns: Vec<(StockField, String)>,
    /// 品番が空で `ITEM_000001` 形式を割り当てた数
    pub generated_codes: usize,
    /// 数量が解釈できず0とした数
    pub invalid_quantities: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StockMaster {
    pub records: Vec<CatalogRecord>,
    pub report: IngestReport,
}

/// ファイルから在庫マスタを読み込む
pub fn load_stock_master(path: &Path) -> Result<StockMaster> {
    let rows = read_rows(path)?;
    let master = parse_stock_rows(rows)?;
    tracing::info!(
        path = %path.display(),
        records = master.records.len(),
        skipped = master.report.skipped_rows.len(),
        "stock master loaded"
    );
    Ok(master)
}

/// 行列（先頭がヘッダー）から在庫マスタを構築する
pub fn parse_stock_rows(rows: Vec<Vec<String>>) -> Result<StockMaster> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| BomError::InvalidStockMaster("ヘッダー行がありません".into()))?
        .iter()
        .map(|h| clean_header(h))
        .collect();

    let column = |name: &str| header.iter().position(|h| h == name);

    let mut mapped: Vec<(StockField, usize)> = Vec::new();
    for field in StockField::ALL {
        if let Some(idx) = field.aliases().iter().find_map(|alias| column(alias)) {
            mapped.push((field, idx));
        }
    }
    let col_of = |field: StockField| mapped.iter().find(|(f, _)| *f == field).map(|(_, i)| *i);

    let desc_pair = column("prd_desc1").zip(column("prd_desc2"));
    let main_desc = column("maindesc");

    if col_of(StockField::Description).is_none() && desc_pair.is_none() {
        return Err(BomError::InvalidStockMaster(format!(
            "品名列が見つかりません（列: {}）",
            header.join(", ")
        )));
    }

    let mut report = IngestReport {
        columns_found: header.clone(),
        mapped_columns: mapped
            .iter()
            .map(|(f, i)| (*f, header[*i].clone()))
            .collect(),
        ..Default::default()
    };

    let mut records = Vec::new();
    let mut seen_codes: HashSet<String> = HashSet::new();

    for (idx, row) in rows.enumerate() {
        let data_row = idx + 1;
        report.original_rows += 1;

        let cell = |i: Option<usize>| -> String {
            i.and_then(|i| row.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let mut description = match desc_pair {
            Some((d1, d2)) => [cell(Some(d1)), cell(Some(d2))]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" | "),
            None => cell(col_of(StockField::Description)),
        };
        if description.is_empty() {
            description = cell(main_desc);
        }

        let mut product_code = cell(col_of(StockField::ProductCode));

        if product_code.is_empty() && description.is_empty() {
            report.skipped_rows.push(data_row);
            if report.skipped_rows.len() <= 5 {
                tracing::warn!(row = data_row, "stock row skipped: no product code or description");
            }
            continue;
        }
        if product_code.is_empty() {
            product_code = format!("ITEM_{:06}", data_row);
            report.generated_codes += 1;
        }

        if !seen_codes.insert(product_code.clone()) {
            return Err(rfp_bom_common::Error::DuplicateProductCode(product_code).into());
        }

        let on_hand = match parse_quantity(&cell(col_of(StockField::OnHand))) {
            Some(q) => q,
            None => {
                report.invalid_quantities += 1;
                0
            }
        };

        let mut record = CatalogRecord::new(product_code, description, on_hand);
        if let Some(price) = parse_number(&cell(col_of(StockField::UnitPrice))) {
            record = record.with_unit_price(price);
        }
        let unit = cell(col_of(StockField::Unit));
        if !unit.is_empty() {
            record = record.with_unit(unit);
        }

        records.push(record);
    }

    report.accepted = records.len();
    Ok(StockMaster { records, report })
}

/// 数量の解釈（空欄は0、負数は0、小数は切り捨て、解釈不能は None）
fn parse_quantity(text: &str) -> Option<u64> {
    if text.is_empty() {
        return Some(0);
    }
    parse_number(text).map(|n| if n <= 0.0 { 0 } else { n.floor() as u64 })
}

fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
