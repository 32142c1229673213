//! JSON出力

use crate::error::Result;
use rfp_bom_common::{BomSummary, MatchResult};
use serde::Serialize;
use std::path::Path;

/// 照合結果レポート
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomReport<'a> {
    pub generated_at: String,
    pub summary: BomSummary,
    pub results: &'a [MatchResult],
}

impl<'a> BomReport<'a> {
    pub fn new(results: &'a [MatchResult]) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            summary: BomSummary::from_results(results),
            results,
        }
    }
}

pub fn generate_json(results: &[MatchResult], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&BomReport::new(results))?;
    std::fs::write(output_path, json)?;
    Ok(())
}
