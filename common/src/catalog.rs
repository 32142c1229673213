//! 在庫マスタ索引
//!
//! 読込ごとに全件から構築し、構築後は変更しない。
//! バケット別に 値 → レコード位置 の逆引き表を持ち、候補絞り込みに使う。

use crate::bucket::{AttributeSet, Bucket};
use crate::normalizer::normalize;
use crate::rules::extract;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 在庫マスタの1レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub product_code: String,
    pub description: String,
    #[serde(default)]
    pub on_hand: u64,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// 品名から抽出した属性（索引構築時に設定）
    #[serde(skip)]
    pub attributes: AttributeSet,
}

impl CatalogRecord {
    pub fn new(product_code: impl Into<String>, description: impl Into<String>, on_hand: u64) -> Self {
        Self {
            product_code: product_code.into(),
            description: description.into(),
            on_hand,
            unit_price: None,
            unit: None,
            attributes: AttributeSet::default(),
        }
    }

    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// 索引の統計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub records: usize,
    pub zero_stock: usize,
    pub missing_description: usize,
    /// バケットごとの異なり値数（番号順）
    pub distinct_values: Vec<(Bucket, usize)>,
}

/// 構築済みの在庫マスタ索引
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: Vec<CatalogRecord>,
    by_code: HashMap<String, usize>,
    by_value: HashMap<Bucket, HashMap<String, Vec<usize>>>,
}

impl CatalogIndex {
    /// レコード列から索引を構築する
    ///
    /// 品名は一度だけ正規化・抽出する。並び順は読込順のまま保持する。
    /// 品番の重複検査は取込側の責務で、ここでは後勝ちにしない（最初の位置を保持）。
    pub fn build(records: Vec<CatalogRecord>) -> Self {
        let mut index = CatalogIndex {
            records: Vec::with_capacity(records.len()),
            by_code: HashMap::with_capacity(records.len()),
            by_value: HashMap::new(),
        };

        for (position, mut record) in records.into_iter().enumerate() {
            record.attributes = extract(&normalize(&record.description));

            for bucket in record.attributes.populated() {
                let values = index.by_value.entry(bucket).or_default();
                for value in record.attributes.get(bucket) {
                    values.entry(value.to_string()).or_default().push(position);
                }
            }

            index
                .by_code
                .entry(record.product_code.clone())
                .or_insert(position);
            index.records.push(record);
        }

        tracing::debug!(
            records = index.records.len(),
            buckets = index.by_value.len(),
            "catalog index built"
        );
        index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&CatalogRecord> {
        self.records.get(position)
    }

    pub fn find_by_code(&self, product_code: &str) -> Option<&CatalogRecord> {
        self.by_code.get(product_code).and_then(|&i| self.records.get(i))
    }

    /// 指定バケットで値を持つレコード位置（昇順）
    pub fn positions(&self, bucket: Bucket, value: &str) -> &[usize] {
        self.by_value
            .get(&bucket)
            .and_then(|values| values.get(value))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 指定バケットの異なり値数
    pub fn distinct_values(&self, bucket: Bucket) -> usize {
        self.by_value.get(&bucket).map(|v| v.len()).unwrap_or(0)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            records: self.records.len(),
            zero_stock: self.records.iter().filter(|r| r.on_hand == 0).count(),
            missing_description: self
                .records
                .iter()
                .filter(|r| r.description.trim().is_empty())
                .count(),
            distinct_values: Bucket::ALL
                .into_iter()
                .map(|b| (b, self.distinct_values(b)))
                .collect(),
        }
    }
}
