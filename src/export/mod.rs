pub mod excel;
pub mod json;
pub mod layout;

use crate::cli::ExportFormat;
use crate::error::Result;
use rfp_bom_common::MatchResult;
use std::path::{Path, PathBuf};

/// 出力先がディレクトリ（または拡張子なし）なら `<dir>/<stem>.<ext>`、ファイルならそのまま
fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

/// both のときは拡張子だけ変えて2ファイル出す
fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(format!("{}.xlsx", stem)),
            output.join(format!("{}.json", stem)),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        (
            parent.join(format!("{}.xlsx", stem)),
            parent.join(format!("{}.json", stem)),
        )
    }
}

/// 照合結果を出力し、書き出したファイルのパスを返す
pub fn export_results(
    results: &[MatchResult],
    format: ExportFormat,
    output: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    if output.extension().is_none() && !output.exists() {
        std::fs::create_dir_all(output)?;
    }

    let written = match format {
        ExportFormat::Excel => {
            let path = output_path_for_format(output, stem, "xlsx");
            excel::generate_excel(results, &path)?;
            vec![path]
        }
        ExportFormat::Json => {
            let path = output_path_for_format(output, stem, "json");
            json::generate_json(results, &path)?;
            vec![path]
        }
        ExportFormat::Both => {
            let (excel_path, json_path) = output_paths_for_both(output, stem);
            excel::generate_excel(results, &excel_path)?;
            json::generate_json(results, &json_path)?;
            vec![excel_path, json_path]
        }
    };

    for path in &written {
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/report.xlsx"), "bom", "xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }

    #[test]
    fn test_output_path_for_directory() {
        let path = output_path_for_format(Path::new("out"), "bom", "json");
        assert_eq!(path, PathBuf::from("out/bom.json"));
    }

    #[test]
    fn test_output_paths_for_both_from_file() {
        let (excel, json) = output_paths_for_both(Path::new("out/report.xlsx"), "bom");
        assert_eq!(excel, PathBuf::from("out/report.xlsx"));
        assert_eq!(json, PathBuf::from("out/report.json"));
    }
}
