//! バケット抽出ルール
//!
//! 正規化済みテキストから11バケットの候補値を抽出する。
//! ルールは宣言的なデータ（パターン → バケット → 値の正規化関数 → 出現範囲）で、
//! 分類体系を拡張するときは `RULES` に行を足すだけでよい。
//!
//! ## 呼び径（Size 1 / Size 2）の割り当て
//! 同じ呼び径パターンを Size 1（`Scope::First`）と Size 2（`Scope::AfterFirst`）の
//! 両方に登録している。テキスト中で最初に現れた呼び径が Size 1、
//! それ以降に現れた異なる呼び径が Size 2 になる（`6in x 4in` → 6 / 4）。

use crate::bucket::{AttributeSet, Bucket};
use crate::normalizer::{normalize, NormalizedText};
use regex::{Captures, Regex};

/// ルールが値を採用する出現範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// すべての一致
    All,
    /// 最初の一致のみ
    First,
    /// 最初の一致を除くすべて（最初の一致と同じ値は除外）
    AfterFirst,
}

/// 一致箇所から正規値を作る関数
#[derive(Debug, Clone, Copy)]
pub enum Canon {
    /// グループ1（なければ一致全体）を別名表で置換。表にない語はそのまま
    Alias(&'static [(&'static str, &'static str)]),
    /// 常に固定値
    Fixed(&'static str),
    /// グループ1をそのまま
    Capture,
    /// 接頭辞 + グループ1（"psl" + "2" → "psl2"）
    Prefixed(&'static str),
    /// 規格番号 + 任意のグレード（a106 + b → "a106b", a333 + 6 → "a333 gr6"）
    Spec(&'static str),
    /// スケジュール番号（40 → "sch40"）
    Schedule,
    /// 肉厚mm（7.110 → "7.11mm"）
    WallThickness,
    /// 肉厚インチ（0.280 → "0.28in"）
    WallInches,
    /// 呼び径（インチ / DN / NB をインチ表記に統一）
    NominalSize,
    /// フランジ形式 + 座面（wnrf → "wn", "rf"）
    FlangeStyle,
    /// エルボ角度 + 曲率（90lr → "90", "lr"）
    ///
    /// グループ1が呼び径の接頭辞（dn/nb/nps）なら値なし。グループ2が角度、3か4が曲率。
    ElbowAngle,
    /// ステンレス鋼種（ss304 → "304", tp316l → "316l"）
    StainlessGrade,
}

/// 抽出ルール
#[derive(Debug, Clone, Copy)]
pub struct BucketRule {
    pub bucket: Bucket,
    pub pattern: &'static str,
    pub canon: Canon,
    pub scope: Scope,
}

const fn rule(bucket: Bucket, pattern: &'static str, canon: Canon) -> BucketRule {
    BucketRule { bucket, pattern, canon, scope: Scope::All }
}

const fn scoped(bucket: Bucket, pattern: &'static str, canon: Canon, scope: Scope) -> BucketRule {
    BucketRule { bucket, pattern, canon, scope }
}

const ITEM_GROUPS: &[(&str, &str)] = &[
    ("pipes", "pipe"),
    ("elbows", "elbow"),
    ("ell", "elbow"),
    ("ells", "elbow"),
    ("caps", "cap"),
    ("flanges", "flange"),
    ("flg", "flange"),
    ("flgs", "flange"),
    ("tees", "tee"),
    ("reducers", "reducer"),
    ("red", "reducer"),
    ("redg", "reducer"),
    ("bends", "bend"),
    ("swages", "swage"),
    ("couplings", "coupling"),
    ("cplg", "coupling"),
    ("cplgs", "coupling"),
    ("clpg", "coupling"),
    ("clpgs", "coupling"),
    ("unions", "union"),
    ("nipples", "nipple"),
    ("plugs", "plug"),
    ("inserts", "insert"),
    ("pipets", "pipet"),
    ("weldolets", "weldolet"),
    ("sockolets", "sockolet"),
    ("elbolets", "elbolet"),
    ("threadolets", "threadolet"),
];

const FLANGE_STYLES: &[(&str, &str)] = &[
    ("weldneck", "wn"),
    ("slipon", "so"),
    ("blind", "bl"),
    ("lapjoint", "lj"),
];

const FLANGE_FACINGS: &[(&str, &str)] = &[
    ("raisedface", "rf"),
    ("flatface", "ff"),
    ("ringtypejoint", "rtj"),
];

const END_FINISHES: &[(&str, &str)] = &[
    ("npt", "threaded"),
    ("thrd", "threaded"),
    ("thd", "threaded"),
    ("scrd", "threaded"),
    ("screwed", "threaded"),
    ("sw", "socket weld"),
    ("socketweld", "socket weld"),
    ("bw", "butt weld"),
    ("buttweld", "butt weld"),
    ("we", "butt weld"),
    ("smls", "seamless"),
    ("erw", "welded"),
    ("beveledend", "bevel end"),
    ("beveledends", "bevel end"),
    ("bevelledend", "bevel end"),
    ("bevelledends", "bevel end"),
    ("bevelend", "bevel end"),
    ("bevelends", "bevel end"),
    ("plainend", "plain end"),
    ("plainends", "plain end"),
];

const ELBOW_RADII: &[(&str, &str)] = &[
    ("longradius", "lr"),
    ("shortradius", "sr"),
];

const ITEM_TYPES: &[(&str, &str)] = &[
    ("eq", "equal"),
    ("straight", "equal"),
    ("ecc", "eccentric"),
    ("con", "concentric"),
    ("conc", "concentric"),
    ("red", "reducing"),
    ("redg", "reducing"),
];

const MATERIAL_FAMILIES: &[(&str, &str)] = &[
    ("cs", "carbon steel"),
    ("carbonsteel", "carbon steel"),
    ("ss", "stainless steel"),
    ("stainlesssteel", "stainless steel"),
    ("alloysteel", "alloy steel"),
];

const SCHEDULE_WORDS: &[(&str, &str)] = &[
    ("xh", "xs"),
    ("xxh", "xxs"),
];

const MISC_MARKS: &[(&str, &str)] = &[
    ("galv", "galvanized"),
    ("galvanised", "galvanized"),
    ("hdg", "galvanized"),
    ("sourservice", "nace"),
];

/// 呼び径パターン（DN / NB / NPS / インチ）
///
/// 末尾に `wt` が付いたインチ値は肉厚なので値を出さない（グループ5）。
const SIZE_PATTERN: &str =
    r"\b(?:dn\s?(\d{1,4})|nb\s?(\d+(?:\.\d+)?)|nps\s?(\d+(?:\.\d+/\d+|/\d+|\.\d+)?)|(\d+(?:\.\d+/\d+|/\d+|\.\d+)?)in)\b(\s?wt\b)?";

/// 抽出ルール表
///
/// 同じテキストが複数バケットに値を出すことがある（"red" は Item Group の reducer と
/// Item Type の reducing の両方）。比較は両側に同じ表を適用するので問題にならない。
pub const RULES: &[BucketRule] = &[
    // 1. Class Rating（正規化で "150#", "class 150" は "150lb" になっている）
    rule(
        Bucket::ClassRating,
        r"\b(150|300|400|600|800|900|1500|2000|2500|3000|6000|9000)lb\b",
        Canon::Capture,
    ),
    // 2. Item Group
    rule(
        Bucket::ItemGroup,
        r"\b(pipes?|elbows?|ells?|caps?|flanges?|flgs?|tees?|reducers?|redg|red|bends?|swages?|couplings?|cplgs?|clpgs?|boss|unions?|nipples?|plugs?|cross|inserts?|pipets?|weldolets?|sockolets?|elbolets?|threadolets?)\b",
        Canon::Alias(ITEM_GROUPS),
    ),
    // 3. Flange Type / Facing（連結表記 "wnrf" を先に、単独表記を後に）
    rule(
        Bucket::FlangeType,
        r"\b(wn|so|bl|lj)(rf|ff|rtj)\b",
        Canon::FlangeStyle,
    ),
    rule(
        Bucket::FlangeType,
        r"\b(wn|weld[\s-]?neck|so|slip[\s-]?on|bl|blind|lj|lap[\s-]?joint)\b",
        Canon::Alias(FLANGE_STYLES),
    ),
    rule(
        Bucket::FlangeType,
        r"\b(rf|ff|rtj|raised[\s-]?face|flat[\s-]?face|ring[\s-]?type[\s-]?joint)\b",
        Canon::Alias(FLANGE_FACINGS),
    ),
    // 4. Ends / Finish
    rule(
        Bucket::EndsFinish,
        r"\b(npt|threaded|thrd|thd|scrd|screwed|sw|socket[\s-]?weld|bw|butt[\s-]?weld|we|smls|seamless|welded|erw|bevell?ed[\s-]?ends?|bevel[\s-]?ends?|plain[\s-]?ends?)\b",
        Canon::Alias(END_FINISHES),
    ),
    // 5. Elbow Type（角度 + 任意の曲率、曲率単独、曲げ半径倍数）
    // 角度は度数・曲率の接尾辞か、エルボ/ベンドの語と隣り合うときだけ採る。
    // dn/nb/nps に続く数字は呼び径なので角度にしない（`dn 90`）。
    rule(
        Bucket::ElbowType,
        r"\b(?:(dn|nb|nps)\s?)?(90|45|180)(?:\s?(?:deg(?:ree)?s?|d)\s?(lr|sr)?|\s?(lr|sr))\b",
        Canon::ElbowAngle,
    ),
    rule(
        Bucket::ElbowType,
        r"\b(?:(dn|nb|nps)\s?)?(90|45|180)\s(?:elbows?|ells?|bends?)\b",
        Canon::ElbowAngle,
    ),
    rule(
        Bucket::ElbowType,
        r"\b(?:elbows?|ells?|bends?)\s(?:(dn|nb|nps)\s?)?(90|45|180)\b",
        Canon::ElbowAngle,
    ),
    rule(
        Bucket::ElbowType,
        r"\b(lr|sr|long[\s-]?radius|short[\s-]?radius)\b",
        Canon::Alias(ELBOW_RADII),
    ),
    rule(Bucket::ElbowType, r"\b([35]d)\b", Canon::Capture),
    // 6. Item Type
    rule(
        Bucket::ItemType,
        r"\b(eq|equal|straight|ecc|eccentric|con|conc|concentric|red|redg|reducing|full|half|hex|bull|round)\b",
        Canon::Alias(ITEM_TYPES),
    ),
    // 7. Material
    rule(
        Bucket::Material,
        r"\b(cs|carbon[\s-]?steel|ss|stainless[\s-]?steel|alloy[\s-]?steel|duplex)\b",
        Canon::Alias(MATERIAL_FAMILIES),
    ),
    rule(Bucket::Material, r"\b(x42|x46|x52|x56|x60|x65|x70|x80)\b", Canon::Capture),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?a106(?:[\s-]?(?:gr\.?\s?|grade\s)?([abc]))?\b",
        Canon::Spec("a106"),
    ),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?a53(?:[\s-]?(?:gr\.?\s?|grade\s)?([ab]))?\b",
        Canon::Spec("a53"),
    ),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?a333(?:[\s-]?(?:gr\.?\s?|grade\s)?(\d))?\b",
        Canon::Spec("a333"),
    ),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?a234(?:[\s-]?(wp[a-z0-9]+))?\b",
        Canon::Spec("a234"),
    ),
    rule(Bucket::Material, r"\b234(wpb)\b", Canon::Spec("a234")),
    rule(Bucket::Material, r"\b(?:sa/)?a105(n)?\b", Canon::Spec("a105")),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?a350(?:[\s-]?(lf[1-3]))?\b",
        Canon::Spec("a350"),
    ),
    rule(
        Bucket::Material,
        r"\b(?:sa/)?(a182|a312|a358|a403|a420)\b",
        Canon::Capture,
    ),
    // "304/304l" は2回一致して 304 と 304l の両方になる
    rule(
        Bucket::Material,
        r"\b(?:ss|tp|wp|f)?(304|310|316|321|347)(l|h)?\b",
        Canon::StainlessGrade,
    ),
    rule(
        Bucket::Material,
        r"\b(?:ss|tp|wp|f)?(304|310|316|321|347)/(l)\b",
        Canon::StainlessGrade,
    ),
    // 8. Thickness / Schedule
    rule(
        Bucket::Thickness,
        r"\bsch(?:edule)?\s?(\d{1,3}s?|std|xs|xxs)\b",
        Canon::Schedule,
    ),
    rule(
        Bucket::Thickness,
        r"\bs(10|20|30|40|60|80|100|120|140|160|std|xs|xxs)\b",
        Canon::Schedule,
    ),
    rule(Bucket::Thickness, r"\b(5s|10s|40s|80s)\b", Canon::Schedule),
    rule(
        Bucket::Thickness,
        r"\b(std|xs|xxs|xh|xxh)\b",
        Canon::Alias(SCHEDULE_WORDS),
    ),
    rule(Bucket::Thickness, r"\b(\d+(?:\.\d+)?)\s?mm\b", Canon::WallThickness),
    rule(Bucket::Thickness, r"\b(\d+(?:\.\d+)?)in\s?wt\b", Canon::WallInches),
    // 9 / 10. Size（同一パターン。最初の呼び径が Size 1、以降が Size 2）
    scoped(Bucket::Size1, SIZE_PATTERN, Canon::NominalSize, Scope::First),
    scoped(Bucket::Size2, SIZE_PATTERN, Canon::NominalSize, Scope::AfterFirst),
    // 11. Misc
    rule(
        Bucket::Misc,
        r"\bapi\s?(5l|5ct|6a|6d|594|598|600|602)\b",
        Canon::Prefixed("api "),
    ),
    rule(Bucket::Misc, r"\bapi\b", Canon::Fixed("api")),
    rule(Bucket::Misc, r"\bpsl\s?([1-3])\b", Canon::Prefixed("psl")),
    rule(Bucket::Misc, r"\btype\s?([abc])\b", Canon::Prefixed("type ")),
    rule(
        Bucket::Misc,
        r"\b(?:asme\s?|ansi\s?)?b(16\.5|16\.9|16\.11|16\.47|36\.10|36\.19)m?\b",
        Canon::Prefixed("b"),
    ),
    rule(
        Bucket::Misc,
        r"\b(nace|galv|galvanized|galvanised|hdg|sour\s?service)\b",
        Canon::Alias(MISC_MARKS),
    ),
];

struct CompiledRule {
    rule: &'static BucketRule,
    regex: Regex,
}

lazy_static::lazy_static! {
    static ref COMPILED_RULES: Vec<CompiledRule> = RULES
        .iter()
        .map(|rule| CompiledRule {
            rule,
            regex: Regex::new(rule.pattern).unwrap(),
        })
        .collect();
}

/// 正規化済みテキストからバケット値を抽出する
///
/// 一致しないバケットは空のまま（RFP行が属性を省略するのは通常のこと）。
pub fn extract(text: &NormalizedText) -> AttributeSet {
    let mut attributes = AttributeSet::new();
    if text.is_empty() {
        return attributes;
    }

    for compiled in COMPILED_RULES.iter() {
        for value in apply_rule(compiled, text.as_str(), compiled.rule.scope) {
            attributes.insert(compiled.rule.bucket, &value);
        }
    }

    attributes
}

/// 生テキストを正規化してから抽出する
pub fn extract_text(raw: &str) -> AttributeSet {
    extract(&normalize(raw))
}

/// ヒントの値を指定バケットの正規値に揃える
///
/// バケットのルールで値が取れればそれを使い、取れなければ正規化した生の値を使う。
/// ヒントは単一の値なので出現範囲は無視する。
pub fn canonicalize_hint(bucket: Bucket, raw: &str) -> Vec<String> {
    let text = normalize(raw);
    if text.is_empty() {
        return Vec::new();
    }

    let mut values: Vec<String> = Vec::new();
    for compiled in COMPILED_RULES.iter().filter(|c| c.rule.bucket == bucket) {
        for value in apply_rule(compiled, text.as_str(), Scope::All) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }

    if values.is_empty() {
        values.push(text.as_str().to_string());
    }
    values
}

/// ヒントの (バケット, 生の値) を正規化して属性集合にする
pub fn hint_attributes<'a>(pairs: impl IntoIterator<Item = (Bucket, &'a str)>) -> AttributeSet {
    let mut attributes = AttributeSet::new();
    for (bucket, raw) in pairs {
        for value in canonicalize_hint(bucket, raw) {
            attributes.insert(bucket, &value);
        }
    }
    attributes
}

fn apply_rule(compiled: &CompiledRule, text: &str, scope: Scope) -> Vec<String> {
    let per_match: Vec<Vec<String>> = compiled
        .regex
        .captures_iter(text)
        .map(|caps| compiled.rule.canon.apply(&caps))
        .filter(|values| !values.is_empty())
        .collect();

    match scope {
        Scope::All => per_match.into_iter().flatten().collect(),
        Scope::First => per_match.into_iter().next().unwrap_or_default(),
        Scope::AfterFirst => {
            let first = per_match.first().cloned().unwrap_or_default();
            per_match
                .into_iter()
                .skip(1)
                .flatten()
                .filter(|v| !first.contains(v))
                .collect()
        }
    }
}

impl Canon {
    fn apply(&self, caps: &Captures) -> Vec<String> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());
        let primary = group(1).or_else(|| group(0)).unwrap_or_default();

        match self {
            Canon::Alias(table) => vec![lookup(table, primary)],
            Canon::Fixed(value) => vec![value.to_string()],
            Canon::Capture => vec![primary.to_string()],
            Canon::Prefixed(prefix) => vec![format!("{}{}", prefix, primary)],
            Canon::Spec(base) => vec![spec_grade(base, group(1))],
            Canon::Schedule => vec![schedule(primary)],
            Canon::WallThickness => vec![format!("{}mm", trim_decimal(primary))],
            Canon::WallInches => vec![format!("{}in", trim_decimal(primary))],
            Canon::NominalSize => nominal_size(caps).into_iter().collect(),
            Canon::FlangeStyle => {
                let mut values = vec![lookup(FLANGE_STYLES, primary)];
                if let Some(facing) = group(2) {
                    values.push(lookup(FLANGE_FACINGS, facing));
                }
                values
            }
            Canon::ElbowAngle => {
                if group(1).is_some() {
                    return Vec::new();
                }
                let mut values: Vec<String> = group(2).map(|a| a.to_string()).into_iter().collect();
                if let Some(radius) = group(3).or_else(|| group(4)) {
                    values.push(radius.to_string());
                }
                values
            }
            Canon::StainlessGrade => {
                vec![format!("{}{}", primary, group(2).unwrap_or_default())]
            }
        }
    }
}

/// 空白・ハイフンを除いたキーで別名表を引く
fn lookup(table: &[(&str, &str)], key: &str) -> String {
    let squashed: String = key
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    table
        .iter()
        .find(|(alias, _)| *alias == squashed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| key.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn spec_grade(base: &str, grade: Option<&str>) -> String {
    match grade {
        None => base.to_string(),
        Some(g) if g.len() == 1 && g.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{}{}", base, g)
        }
        Some(g) if g.chars().all(|c| c.is_ascii_digit()) => format!("{} gr{}", base, g),
        Some(g) => format!("{} {}", base, g),
    }
}

fn schedule(value: &str) -> String {
    if value.starts_with(|c: char| c.is_ascii_digit()) {
        format!("sch{}", value)
    } else {
        value.to_string()
    }
}

/// "6.0" → "6", "7.110" → "7.11"
fn trim_decimal(value: &str) -> String {
    if !value.contains('.') || value.contains('/') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// 小数インチを配管の呼び表記にする（"1.5" → "1.1/2"）
///
/// 分数表にない値は書かれた数字のまま（"6.0" → "6"）。
fn inch_from_decimal(text: &str) -> String {
    const FRACTIONS: &[(f64, &str)] = &[
        (0.125, "1/8"),
        (0.25, "1/4"),
        (0.375, "3/8"),
        (0.5, "1/2"),
        (0.75, "3/4"),
        (1.25, "1.1/4"),
        (1.5, "1.1/2"),
        (2.5, "2.1/2"),
        (3.5, "3.1/2"),
    ];

    if let Ok(value) = text.parse::<f64>() {
        if let Some((_, label)) = FRACTIONS.iter().find(|(v, _)| (v - value).abs() < 1e-6) {
            return label.to_string();
        }
    }
    trim_decimal(text)
}

/// DN（mm）→ NPS（インチ）
fn nps_from_dn(dn: u32) -> Option<&'static str> {
    const TABLE: &[(u32, &str)] = &[
        (6, "1/8"),
        (8, "1/4"),
        (10, "3/8"),
        (15, "1/2"),
        (20, "3/4"),
        (25, "1"),
        (32, "1.1/4"),
        (40, "1.1/2"),
        (50, "2"),
        (65, "2.1/2"),
        (80, "3"),
        (90, "3.1/2"),
        (100, "4"),
        (125, "5"),
        (150, "6"),
        (200, "8"),
        (250, "10"),
        (300, "12"),
        (350, "14"),
        (400, "16"),
        (450, "18"),
        (500, "20"),
        (550, "22"),
        (600, "24"),
        (650, "26"),
        (700, "28"),
        (750, "30"),
        (800, "32"),
        (850, "34"),
        (900, "36"),
        (950, "38"),
        (1000, "40"),
        (1050, "42"),
        (1100, "44"),
        (1200, "48"),
    ];
    TABLE.iter().find(|(d, _)| *d == dn).map(|(_, nps)| *nps)
}

fn inch_text(value: &str) -> String {
    if value.contains('/') {
        return value.to_string();
    }
    inch_from_decimal(value)
}

fn nominal_size(caps: &Captures) -> Option<String> {
    if caps.get(5).is_some() {
        return None;
    }
    if let Some(dn) = caps.get(1) {
        let text = dn.as_str();
        return Some(
            text.parse::<u32>()
                .ok()
                .and_then(nps_from_dn)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("dn{}", text)),
        );
    }
    caps.get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| inch_text(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(set: &AttributeSet, bucket: Bucket) -> Vec<String> {
        set.get(bucket).map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(COMPILED_RULES.len(), RULES.len());
    }

    #[test]
    fn test_every_bucket_has_a_rule() {
        for bucket in Bucket::ALL {
            assert!(
                RULES.iter().any(|r| r.bucket == bucket),
                "no rule for {}",
                bucket
            );
        }
    }

    #[test]
    fn test_extract_pipe_line() {
        let set = extract_text("6\" SCH40 SMLS PIPE API 5L X52 PSL2\"");
        assert_eq!(values(&set, Bucket::ItemGroup), vec!["pipe"]);
        assert_eq!(values(&set, Bucket::EndsFinish), vec!["seamless"]);
        assert_eq!(values(&set, Bucket::Material), vec!["x52"]);
        assert_eq!(values(&set, Bucket::Thickness), vec!["sch40"]);
        assert_eq!(values(&set, Bucket::Size1), vec!["6"]);
        assert!(!set.has(Bucket::Size2));
        assert!(set.contains(Bucket::Misc, "api 5l"));
        assert!(set.contains(Bucket::Misc, "psl2"));
        assert!(!set.has(Bucket::ClassRating));
        assert!(!set.has(Bucket::ElbowType));
    }

    #[test]
    fn test_catalog_wording_matches_rfp_wording() {
        let rfp = extract_text("6\" SCH40 SMLS PIPE API 5L X52 PSL2\"");
        let catalog = extract_text("6 INCH SCHEDULE 40 SEAMLESS PIPE API 5L GRADE X52 PSL2");
        assert_eq!(rfp, catalog);
    }

    #[test]
    fn test_extract_flange_line() {
        let set = extract_text("4\" 150# WNRF FLANGE A105");
        assert_eq!(values(&set, Bucket::ClassRating), vec!["150"]);
        assert_eq!(values(&set, Bucket::ItemGroup), vec!["flange"]);
        assert_eq!(values(&set, Bucket::FlangeType), vec!["rf", "wn"]);
        assert_eq!(values(&set, Bucket::Material), vec!["a105"]);
        assert_eq!(values(&set, Bucket::Size1), vec!["4"]);
    }

    #[test]
    fn test_flange_spelled_out() {
        let set = extract_text("WELD NECK RAISED FACE FLANGE CLASS 300");
        assert_eq!(values(&set, Bucket::FlangeType), vec!["rf", "wn"]);
        assert_eq!(values(&set, Bucket::ClassRating), vec!["300"]);
    }

    #[test]
    fn test_reducer_sizes_first_is_size1() {
        let set = extract_text("6\"x4\" CONC REDUCER SCH 80 A234 WPB");
        assert_eq!(values(&set, Bucket::Size1), vec!["6"]);
        assert_eq!(values(&set, Bucket::Size2), vec!["4"]);
        assert_eq!(values(&set, Bucket::ItemGroup), vec!["reducer"]);
        assert_eq!(values(&set, Bucket::ItemType), vec!["concentric"]);
        assert_eq!(values(&set, Bucket::Thickness), vec!["sch80"]);
        assert_eq!(values(&set, Bucket::Material), vec!["a234 wpb"]);
    }

    #[test]
    fn test_reducer_order_follows_text() {
        let set = extract_text("4\" x 6\" REDUCER");
        assert_eq!(values(&set, Bucket::Size1), vec!["4"]);
        assert_eq!(values(&set, Bucket::Size2), vec!["6"]);
    }

    #[test]
    fn test_repeated_size_does_not_fill_size2() {
        let set = extract_text("2\" TEE 2\" SW");
        assert_eq!(values(&set, Bucket::Size1), vec!["2"]);
        assert!(!set.has(Bucket::Size2));
    }

    #[test]
    fn test_dn_and_nb_sizes() {
        let set = extract_text("DN100 STD A234 90 DEGREE LONG RADIUS ELBOW");
        assert_eq!(values(&set, Bucket::Size1), vec!["4"]);
        assert_eq!(values(&set, Bucket::Thickness), vec!["std"]);
        assert_eq!(values(&set, Bucket::ElbowType), vec!["90", "lr"]);
        assert_eq!(values(&set, Bucket::ItemGroup), vec!["elbow"]);
        assert_eq!(values(&set, Bucket::Material), vec!["a234"]);

        let set = extract_text("NB 6.0 7.11MM SMLS PIPE");
        assert_eq!(values(&set, Bucket::Size1), vec!["6"]);
        assert_eq!(values(&set, Bucket::Thickness), vec!["7.11mm"]);
    }

    #[test]
    fn test_fractional_sizes() {
        assert_eq!(values(&extract_text("1-1/2\" COUPLING"), Bucket::Size1), vec!["1.1/2"]);
        assert_eq!(values(&extract_text("1.5\" COUPLING"), Bucket::Size1), vec!["1.1/2"]);
        assert_eq!(values(&extract_text("DN15 NIPPLE"), Bucket::Size1), vec!["1/2"]);
    }

    #[test]
    fn test_elbow_compact_form() {
        let set = extract_text("2\" 90LR ELL BW");
        assert_eq!(values(&set, Bucket::ElbowType), vec!["90", "lr"]);
        assert_eq!(values(&set, Bucket::ItemGroup), vec!["elbow"]);
        assert_eq!(values(&set, Bucket::EndsFinish), vec!["butt weld"]);
    }

    #[test]
    fn test_size_prefix_is_not_an_angle() {
        let set = extract_text("DN 90 PIPE");
        assert!(!set.has(Bucket::ElbowType));
        assert_eq!(values(&set, Bucket::Size1), vec!["3.1/2"]);

        assert!(!extract_text("DN 90 LR ELBOW").contains(Bucket::ElbowType, "90"));
        assert!(!extract_text("ELBOW NPS 45").has(Bucket::ElbowType));
    }

    #[test]
    fn test_bare_number_is_not_an_angle() {
        assert!(!extract_text("2\" SCH40 SMLS PIPE QTY 90").has(Bucket::ElbowType));
        assert!(!extract_text("45 PCS 2\" CAP").has(Bucket::ElbowType));
    }

    #[test]
    fn test_angle_next_to_elbow_word() {
        assert_eq!(values(&extract_text("2\" 90 ELBOW BW"), Bucket::ElbowType), vec!["90"]);
        assert_eq!(values(&extract_text("ELL 45 SW"), Bucket::ElbowType), vec!["45"]);
        assert_eq!(values(&extract_text("180D RETURN BEND"), Bucket::ElbowType), vec!["180"]);
        assert_eq!(values(&extract_text("45 SR BEND"), Bucket::ElbowType), vec!["45", "sr"]);
    }

    #[test]
    fn test_wall_thickness_in_inches_is_not_size2() {
        let set = extract_text("6\" SCH40 PIPE 0.280\" WT");
        assert_eq!(values(&set, Bucket::Size1), vec!["6"]);
        assert!(!set.has(Bucket::Size2));
        assert_eq!(values(&set, Bucket::Thickness), vec!["0.28in", "sch40"]);

        let set = extract_text("6\" PIPE 0.280\"");
        assert!(!set.has(Bucket::Size2));
        assert!(set.contains(Bucket::Thickness, "0.28in"));

        // 異径の2径目は従来どおり Size 2
        let set = extract_text("6\"x4\" CONC REDUCER");
        assert_eq!(values(&set, Bucket::Size2), vec!["4"]);
    }

    #[test]
    fn test_three_size_tee() {
        let set = extract_text("6\"x4\"x2\" RED TEE");
        assert_eq!(values(&set, Bucket::Size1), vec!["6"]);
        assert_eq!(values(&set, Bucket::Size2), vec!["2", "4"]);
    }

    #[test]
    fn test_oversized_number_keeps_digits() {
        let set = extract_text("99999999999999999999999\" PIPE");
        assert_eq!(values(&set, Bucket::Size1), vec!["99999999999999999999999"]);
        assert_eq!(inch_from_decimal("6.0"), "6");
        assert_eq!(inch_from_decimal("1.50"), "1.1/2");
        assert_eq!(inch_from_decimal("0.5"), "1/2");
    }

    #[test]
    fn test_stainless_dual_grade() {
        let set = extract_text("SS304/304L ELBOW");
        assert!(set.contains(Bucket::Material, "304"));
        assert!(set.contains(Bucket::Material, "304l"));

        let set = extract_text("TP316/L PIPE");
        assert!(set.contains(Bucket::Material, "316"));
        assert!(set.contains(Bucket::Material, "316l"));
    }

    #[test]
    fn test_spec_grades() {
        assert!(extract_text("SA/A106-B PIPE").contains(Bucket::Material, "a106b"));
        assert!(extract_text("A106 GR.B PIPE").contains(Bucket::Material, "a106b"));
        assert!(extract_text("A333 GR.6 PIPE").contains(Bucket::Material, "a333 gr6"));
        assert!(extract_text("234WPB TEE").contains(Bucket::Material, "a234 wpb"));
        assert!(extract_text("A105N FLANGE").contains(Bucket::Material, "a105n"));
    }

    #[test]
    fn test_red_populates_group_and_type() {
        let set = extract_text("RED TEE");
        assert!(set.contains(Bucket::ItemGroup, "reducer"));
        assert!(set.contains(Bucket::ItemGroup, "tee"));
        assert!(set.contains(Bucket::ItemType, "reducing"));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let set = extract_text("MISCELLANEOUS SUNDRY ITEMS");
        assert!(set.is_empty());
        assert!(extract_text("").is_empty());
    }

    #[test]
    fn test_canonicalize_hint() {
        assert_eq!(canonicalize_hint(Bucket::Size1, "6\""), vec!["6"]);
        assert_eq!(canonicalize_hint(Bucket::Size2, "4 inch"), vec!["4"]);
        assert_eq!(canonicalize_hint(Bucket::EndsFinish, "SMLS"), vec!["seamless"]);
        assert_eq!(canonicalize_hint(Bucket::Material, "A106 Gr.B"), vec!["a106b"]);
        // ルールに一致しない値は正規化したまま使う
        assert_eq!(canonicalize_hint(Bucket::Misc, "Hydrotested"), vec!["hydrotested"]);
        assert!(canonicalize_hint(Bucket::Misc, "  ").is_empty());
    }

    #[test]
    fn test_hint_attributes() {
        let set = hint_attributes(vec![
            (Bucket::ItemGroup, "Flanges"),
            (Bucket::ClassRating, "150#"),
        ]);
        assert!(set.contains(Bucket::ItemGroup, "flange"));
        assert!(set.contains(Bucket::ClassRating, "150"));
    }

    #[test]
    fn test_trim_decimal() {
        assert_eq!(trim_decimal("6.0"), "6");
        assert_eq!(trim_decimal("7.110"), "7.11");
        assert_eq!(trim_decimal("12"), "12");
    }
}
