//! ヒント応答パーサー
//!
//! AI CLIの応答からJSONを抽出し、バケット別のヒント属性に変換する

use crate::bucket::{AttributeSet, Bucket};
use crate::error::{Error, Result};
use crate::rules::hint_attributes;
use serde_json::Value;

/// 応答からJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. 生の [...] 配列
/// 4. エラー
///
/// # Examples
/// ```
/// use rfp_bom_common::extract_json;
///
/// let response = "Result: {\"item_group\": \"pipe\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"item_group\": \"pipe\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (response.find(open), response.rfind(close)) {
            if end > start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON found in hint response".into()))
}

/// ヒント応答をパースする
///
/// キーはバケットの表示名・snake_caseキー・番号のいずれでもよい。
/// 値は文字列・数値・文字列配列を受け付け、null や空文字は無視する。
/// 未知のキーは読み飛ばす。有効な値が一つもなければ `Ok(None)`（ヒントなし）。
pub fn parse_hint_response(response: &str) -> Result<Option<AttributeSet>> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("hint JSON parse error: {}", e)))?;

    // [{...}] で返ってきた場合は先頭要素を使う
    let object = match &value {
        Value::Object(map) => map,
        Value::Array(items) => match items.first() {
            Some(Value::Object(map)) => map,
            _ => return Ok(None),
        },
        _ => return Err(Error::Parse("hint JSON is not an object".into())),
    };

    let mut pairs: Vec<(Bucket, String)> = Vec::new();
    for (key, raw) in object {
        let Some(bucket) = Bucket::from_label(key) else {
            tracing::debug!(key = %key, "unknown hint key skipped");
            continue;
        };
        for text in value_texts(raw) {
            pairs.push((bucket, text));
        }
    }

    let attributes = hint_attributes(pairs.iter().map(|(b, s)| (*b, s.as_str())));
    Ok(if attributes.is_empty() { None } else { Some(attributes) })
}

fn value_texts(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Array(items) => items.iter().flat_map(value_texts).collect(),
        _ => Vec::new(),
    }
}
