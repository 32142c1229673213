//! プロンプト生成モジュール
//!
//! - BUCKET_GUIDE: バケットごとの記入例
//! - build_hint_prompt: RFP 1行の属性解釈（ヒント）用プロンプト

use crate::bucket::Bucket;

/// バケットごとの記入例（プロンプトに埋め込む）
pub const BUCKET_GUIDE: &[(Bucket, &str)] = &[
    (Bucket::ClassRating, "pressure class, e.g. 150, 300, 3000"),
    (Bucket::ItemGroup, "pipe, elbow, tee, reducer, flange, cap, coupling, ..."),
    (Bucket::FlangeType, "WN, SO, BL, LJ and facing RF, FF, RTJ"),
    (Bucket::EndsFinish, "seamless, welded, butt weld, socket weld, threaded"),
    (Bucket::ElbowType, "angle and radius, e.g. 90, 45, LR, SR"),
    (Bucket::ItemType, "equal, reducing, concentric, eccentric, ..."),
    (Bucket::Material, "grade, e.g. A106B, A105, A234 WPB, X52, 316L"),
    (Bucket::Thickness, "schedule or wall, e.g. SCH40, STD, XS, 7.11mm"),
    (Bucket::Size1, "main nominal size in inches, e.g. 6, 1.1/2"),
    (Bucket::Size2, "reduced/branch size in inches, if any"),
    (Bucket::Misc, "standards and extras, e.g. API 5L, PSL2, NACE"),
];

/// ヒント用プロンプト生成
///
/// # Arguments
/// * `rfp_text` - RFP 1行の原文
///
/// # Returns
/// バケットキーをそのままJSONキーにしたオブジェクトを要求するプロンプト
pub fn build_hint_prompt(rfp_text: &str) -> String {
    let guide = BUCKET_GUIDE
        .iter()
        .map(|(bucket, example)| format!("- \"{}\" ({}): {}", bucket.key(), bucket.label(), example))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a piping materials engineer reading a procurement (RFP) line item.
Split the line into the attribute buckets below.

## Buckets
{guide}

## Output format (strictly this JSON object)
{{
  "class_rating": "...",
  "item_group": "...",
  "size1": "...",
  "misc": ["...", "..."]
}}

## Rules
- Use only the keys listed above; omit buckets the line does not mention
- A value may be a string or an array of strings
- Copy values from the line; do not guess missing attributes
- Output the JSON object only, no explanation

RFP line:
{rfp_text}"#
    )
}
