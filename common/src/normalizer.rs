//! テキスト正規化
//!
//! RFP行とマスタ品名の両方に同じ処理を適用し、比較の語彙を揃える。
//!
//! ## 処理順
//! 1. 小文字化・引用符/乗算記号の統一
//! 2. インチ表記の統一（`"` / inch / in → `in`）と帯分数（`1-1/2"` → `1.1/2in`）
//! 3. 異径表記の分割（`6"x4"` → `6in x 4in`、`6"x4"x2"` → `6in x 4in x 2in`）
//! 4. インチ表記の肉厚に `wt` を付ける（`0.280in wt`）。呼び径の後の1未満の小数も肉厚とみなす
//! 5. 圧力クラス表記の統一（`#` / lb / lbs / class → `lb`）
//! 6. 意味を持たない記号の除去と空白の圧縮

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 正規化済みテキスト
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 呼び径の数値部（整数・分数・帯分数・小数）
const SIZE_NUM: &str = r"\d+(?:\.\d+/\d+|/\d+|\.\d+)?";

lazy_static::lazy_static! {
    static ref MIXED_FRACTION_RE: Regex = Regex::new(
        r#"\b(\d+)[\s-]+(\d+/\d+)\s*(?:"|inch(?:es)?\b|in\b)"#
    ).unwrap();
    static ref INCH_RE: Regex = Regex::new(
        &format!(r#"\b({SIZE_NUM})\s*(?:"|inch(?:es)?\b|in\b)"#)
    ).unwrap();
    static ref QUOTED_REDUCER_RE: Regex = Regex::new(r#"(\d)\s*"\s*x\s*(\d)"#).unwrap();
    static ref TIGHT_REDUCER_RE: Regex = Regex::new(
        &format!(r"\b({SIZE_NUM})(?:in)?x({SIZE_NUM})(?:in)?(x|\b)")
    ).unwrap();
    static ref LEFT_REDUCER_RE: Regex = Regex::new(
        &format!(r"\b({SIZE_NUM})in\s+x\s+({SIZE_NUM})(?:in)?\b")
    ).unwrap();
    static ref RIGHT_REDUCER_RE: Regex = Regex::new(
        &format!(r"\b({SIZE_NUM})\s+x\s+({SIZE_NUM})in\b")
    ).unwrap();
    static ref WALL_WORD_RE: Regex = Regex::new(
        r"\b(?:wall\s?thickness|wall\s?thk|thickness|thk|wall)\b"
    ).unwrap();
    static ref LEADING_WALL_RE: Regex = Regex::new(r"\bwt\s?(\d+(?:\.\d+)?)in\b").unwrap();
    static ref SIZE_TOKEN_RE: Regex = Regex::new(
        &format!(r"\b(?:(?:dn|nb|nps)\s?\d|({SIZE_NUM})in\b(\s?wt\b)?)")
    ).unwrap();
    static ref CLASS_SUFFIX_RE: Regex = Regex::new(r"\b(\d+)\s*(?:#|lbs?\b)").unwrap();
    static ref CLASS_PREFIX_RE: Regex = Regex::new(r"\b(?:class|cl)\s*(\d{3,4})\b").unwrap();
}

/// テキストを正規化する
///
/// 空文字・空白のみの入力は空の `NormalizedText` を返す。
pub fn normalize(text: &str) -> NormalizedText {
    if text.trim().is_empty() {
        return NormalizedText::default();
    }

    let mut s = text
        .to_lowercase()
        .replace(['\u{201c}', '\u{201d}', '\u{2033}'], "\"")
        .replace(['\u{2018}', '\u{2019}', '\u{2032}'], "'")
        .replace('\u{00d7}', "x")
        .replace("''", "\"");

    // 3径以上は一度の置換で重なるので変化がなくなるまで繰り返す
    s = replace_until_stable(&QUOTED_REDUCER_RE, s, "${1}\" x ${2}");
    s = MIXED_FRACTION_RE.replace_all(&s, "${1}.${2}in").into_owned();
    s = INCH_RE.replace_all(&s, "${1}in").into_owned();

    s = replace_until_stable(&TIGHT_REDUCER_RE, s, "${1}in x ${2}in${3}");
    s = replace_until_stable(&LEFT_REDUCER_RE, s, "${1}in x ${2}in");
    s = replace_until_stable(&RIGHT_REDUCER_RE, s, "${1}in x ${2}in");

    s = WALL_WORD_RE.replace_all(&s, "wt").into_owned();
    s = LEADING_WALL_RE.replace_all(&s, "${1}in wt").into_owned();
    s = mark_wall_thickness(&s);

    s = CLASS_SUFFIX_RE.replace_all(&s, "${1}lb").into_owned();
    s = CLASS_PREFIX_RE.replace_all(&s, "${1}lb").into_owned();

    let stripped = strip_punctuation(&s);
    NormalizedText(collapse_whitespace(&stripped))
}

fn replace_until_stable(re: &Regex, mut text: String, replacement: &str) -> String {
    for _ in 0..8 {
        let next = re.replace_all(&text, replacement).into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    text
}

/// 呼び径の後に現れる1未満の小数インチを肉厚として `wt` を付ける
///
/// 異径表記（`x` の直後）は呼び径のまま残す。
fn mark_wall_thickness(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    let mut seen_size = false;

    for caps in SIZE_TOKEN_RE.captures_iter(text) {
        let Some(number) = caps.get(1) else {
            seen_size = true;
            continue;
        };
        if caps.get(2).is_some() {
            continue;
        }

        let after_reducer_x = text[..number.start()].trim_end().ends_with(" x");
        if seen_size && !after_reducer_x && is_decimal_below_one(number.as_str()) {
            let end = caps.get(0).map_or(number.end(), |m| m.end());
            out.push_str(&text[last..end]);
            out.push_str(" wt");
            last = end;
        } else {
            seen_size = true;
        }
    }

    out.push_str(&text[last..]);
    out
}

fn is_decimal_below_one(number: &str) -> bool {
    number.starts_with("0.") && !number.contains('/')
}

/// 英数字に挟まれた `/ . -` 以外の記号を空白にする
fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c.is_whitespace() {
            out.push(c);
            continue;
        }

        let joins_word = matches!(c, '/' | '.' | '-')
            && i > 0
            && chars[i - 1].is_ascii_alphanumeric()
            && chars.get(i + 1).map(|n| n.is_ascii_alphanumeric()).unwrap_or(false);

        out.push(if joins_word { c } else { ' ' });
    }

    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
