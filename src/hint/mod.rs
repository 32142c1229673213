//! 属性ヒント
//!
//! 外部の解釈サービス（AI CLI）からバケット値のヒントを得る。
//! ヒントは任意で、失敗・タイムアウトは「ヒントなし」として照合を続ける。

pub mod cli;

pub use cli::CliHintProvider;

use crate::rfp_reader::RfpLine;
use rfp_bom_common::{AttributeSet, Error, Result};
use std::future::Future;
use std::time::Duration;

/// ヒント提供者
///
/// `Ok(None)` は明示的な「ヒントなし」、`Err` は失敗（呼び出し側で警告して続行）。
pub trait HintProvider: Sync {
    fn interpret(&self, text: &str) -> impl Future<Output = Result<Option<AttributeSet>>> + Send;
}

/// 常にヒントなし
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHints;

impl HintProvider for NoHints {
    async fn interpret(&self, _text: &str) -> Result<Option<AttributeSet>> {
        Ok(None)
    }
}

/// 1明細ぶんのヒントを時間制限付きで取得する
///
/// 空行は呼び出さない。失敗とタイムアウトは warn ログを出して `None`。
pub async fn fetch_hint<P: HintProvider>(
    provider: &P,
    line: &RfpLine,
    timeout: Duration,
) -> Option<AttributeSet> {
    if line.text.trim().is_empty() {
        return None;
    }

    let error = match tokio::time::timeout(timeout, provider.interpret(&line.text)).await {
        Ok(Ok(hint)) => return hint,
        Ok(Err(e)) => e,
        Err(_) => Error::HintUnavailable(format!("timed out after {}ms", timeout.as_millis())),
    };

    tracing::warn!(
        line = line.line_number,
        error = %error,
        "hint skipped, matching on extracted attributes only"
    );
    None
}
