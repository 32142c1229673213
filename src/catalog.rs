//! 在庫マスタ索引の保持
//!
//! 新しいマスタは外で索引を作り切ってから短い書き込みロックで差し替える。
//! 照合側は `Arc` のスナップショットを取るので、構築途中の索引は見えない。

use crate::error::Result;
use crate::stock_master::{load_stock_master, IngestReport};
use parking_lot::RwLock;
use rfp_bom_common::{CatalogIndex, CatalogRecord, Error};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Option<Arc<CatalogIndex>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードから索引を構築して差し替える
    pub fn replace(&self, records: Vec<CatalogRecord>) -> Arc<CatalogIndex> {
        let index = Arc::new(CatalogIndex::build(records));
        *self.current.write() = Some(Arc::clone(&index));
        tracing::info!(records = index.len(), "catalog replaced");
        index
    }

    /// ファイルから読み込んで差し替える
    ///
    /// 読み込みに失敗した場合は現在の索引を残す。
    pub fn load(&self, path: &Path) -> Result<IngestReport> {
        let master = load_stock_master(path)?;
        self.replace(master.records);
        Ok(master.report)
    }

    /// 現在の索引（未読込・空なら `EmptyCatalog`）
    pub fn snapshot(&self) -> std::result::Result<Arc<CatalogIndex>, Error> {
        match self.current.read().as_ref() {
            Some(index) if !index.is_empty() => Ok(Arc::clone(index)),
            _ => Err(Error::EmptyCatalog),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_ok()
    }
}
