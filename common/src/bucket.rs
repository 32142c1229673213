//! バケット分類モジュール
//!
//! 品目テキストを比較するための11個の固定カテゴリ（バケット）と、
//! その優先度ティア・重み、およびバケット別の抽出値集合を定義する。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// 優先度ティア（High > Medium > Low で固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// フィルタを適用する順序（高→低）
    pub const ORDERED: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    fn rank(self) -> u8 {
        match self {
            Tier::High => 3,
            Tier::Medium => 2,
            Tier::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }

    /// このティアに属するバケット（番号順）
    pub fn buckets(self) -> impl Iterator<Item = Bucket> {
        Bucket::ALL.into_iter().filter(move |b| b.tier() == self)
    }
}

impl PartialOrd for Tier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// 意味カテゴリ（バケット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    ClassRating,
    ItemGroup,
    FlangeType,
    EndsFinish,
    ElbowType,
    ItemType,
    Material,
    Thickness,
    Size1,
    Size2,
    Misc,
}

impl Bucket {
    /// 全バケット（番号順）
    pub const ALL: [Bucket; 11] = [
        Bucket::ClassRating,
        Bucket::ItemGroup,
        Bucket::FlangeType,
        Bucket::EndsFinish,
        Bucket::ElbowType,
        Bucket::ItemType,
        Bucket::Material,
        Bucket::Thickness,
        Bucket::Size1,
        Bucket::Size2,
        Bucket::Misc,
    ];

    /// 1始まりのバケット番号
    pub fn number(self) -> usize {
        Bucket::ALL
            .iter()
            .position(|b| *b == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::ClassRating => "Class Rating",
            Bucket::ItemGroup => "Item Group",
            Bucket::FlangeType => "Flange Type",
            Bucket::EndsFinish => "Ends/Finish",
            Bucket::ElbowType => "Elbow Type",
            Bucket::ItemType => "Item Type",
            Bucket::Material => "Material",
            Bucket::Thickness => "Thickness/Schedule",
            Bucket::Size1 => "Size 1",
            Bucket::Size2 => "Size 2",
            Bucket::Misc => "Miscellaneous",
        }
    }

    /// snake_caseキー（ヒントJSONのキー）
    pub fn key(self) -> &'static str {
        match self {
            Bucket::ClassRating => "class_rating",
            Bucket::ItemGroup => "item_group",
            Bucket::FlangeType => "flange_type",
            Bucket::EndsFinish => "ends_finish",
            Bucket::ElbowType => "elbow_type",
            Bucket::ItemType => "item_type",
            Bucket::Material => "material",
            Bucket::Thickness => "thickness",
            Bucket::Size1 => "size1",
            Bucket::Size2 => "size2",
            Bucket::Misc => "misc",
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            Bucket::ClassRating
            | Bucket::ItemGroup
            | Bucket::FlangeType
            | Bucket::EndsFinish
            | Bucket::ElbowType
            | Bucket::ItemType => Tier::High,
            Bucket::Material | Bucket::Thickness => Tier::Medium,
            Bucket::Size1 | Bucket::Size2 | Bucket::Misc => Tier::Low,
        }
    }

    /// スコア計算の重み（High=3, Medium=2, Low=1）
    pub fn weight(self) -> u32 {
        match self.tier() {
            Tier::High => 3,
            Tier::Medium => 2,
            Tier::Low => 1,
        }
    }

    /// 表示名・キー・番号のいずれからでもバケットを解決
    ///
    /// 空白・記号・大文字小文字の違いは無視する（"Class Rating", "class_rating", "1"）
    pub fn from_label(label: &str) -> Option<Bucket> {
        let squashed: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Ok(n) = squashed.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Bucket::ALL.get(i).copied());
        }

        let found = Bucket::ALL.into_iter().find(|b| {
            let label_sq: String = b
                .label()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            let key_sq: String = b.key().replace('_', "");
            squashed == label_sq || squashed == key_sq
        });
        if found.is_some() {
            return found;
        }

        // 表記揺れ
        match squashed.as_str() {
            "class" | "rating" | "pressureclass" => Some(Bucket::ClassRating),
            "group" | "itemgroup" | "item" => Some(Bucket::ItemGroup),
            "flange" | "flangefacing" | "flangetypefacing" | "facing" => Some(Bucket::FlangeType),
            "ends" | "finish" | "endfinish" | "itemendsfinish" => Some(Bucket::EndsFinish),
            "elbow" => Some(Bucket::ElbowType),
            "type" => Some(Bucket::ItemType),
            "schedule" | "thicknessschedule" | "wallthickness" => Some(Bucket::Thickness),
            "size" | "size1" | "nominalsize" => Some(Bucket::Size1),
            "size2" | "reducedsize" => Some(Bucket::Size2),
            "miscellaneous" | "other" => Some(Bucket::Misc),
            _ => None,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// バケット → 抽出値集合
///
/// 抽出元（RFP行またはマスタレコード）が所有し、構築後は変更しない。
/// 値は正規化済みの小文字文字列で、BTreeSetで順序を固定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    values: BTreeMap<Bucket, BTreeSet<String>>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// (バケット, 値) の組から構築（ヒントやテスト用）
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(Bucket, S)]) -> Self {
        let mut set = Self::new();
        for (bucket, value) in pairs {
            set.insert(*bucket, value.as_ref());
        }
        set
    }

    /// 抽出処理からのみ追加する
    pub(crate) fn insert(&mut self, bucket: Bucket, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.values
            .entry(bucket)
            .or_default()
            .insert(value.to_lowercase());
    }

    /// バケットの値集合（なければ空）
    pub fn get(&self, bucket: Bucket) -> impl Iterator<Item = &str> {
        self.values
            .get(&bucket)
            .into_iter()
            .flat_map(|set| set.iter().map(|s| s.as_str()))
    }

    pub fn contains(&self, bucket: Bucket, value: &str) -> bool {
        self.values
            .get(&bucket)
            .map(|set| set.contains(value))
            .unwrap_or(false)
    }

    pub fn has(&self, bucket: Bucket) -> bool {
        self.values.get(&bucket).map(|s| !s.is_empty()).unwrap_or(false)
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.values.get(&bucket).map(|s| s.len()).unwrap_or(0)
    }

    /// 値を持つバケットが一つもないか
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|s| s.is_empty())
    }

    /// 値を持つバケット（番号順）
    pub fn populated(&self) -> impl Iterator<Item = Bucket> + '_ {
        Bucket::ALL.into_iter().filter(move |b| self.has(*b))
    }

    /// バケット単位の和集合（ヒントのマージ用）
    ///
    /// 既存の値は削除されない。
    pub fn union(&self, other: &AttributeSet) -> AttributeSet {
        let mut merged = self.clone();
        for (bucket, values) in &other.values {
            for value in values {
                merged.insert(*bucket, value);
            }
        }
        merged
    }

    /// 表示用の短い要約（"Item Group=pipe; Size 1=6"）
    pub fn summary(&self) -> String {
        self.populated()
            .map(|b| format!("{}={}", b.label(), self.get(b).collect::<Vec<_>>().join(",")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bucket_has_tier_and_positive_weight() {
        for bucket in Bucket::ALL {
            assert!(bucket.weight() > 0);
            assert!(Tier::ORDERED.contains(&bucket.tier()));
        }
        assert_eq!(Tier::High.buckets().count(), 6);
        assert_eq!(Tier::Medium.buckets().count(), 2);
        assert_eq!(Tier::Low.buckets().count(), 3);
    }

    #[test]
    fn test_tier_order() {
        assert!(Tier::High > Tier::Medium);
        assert!(Tier::Medium > Tier::Low);
        assert_eq!(Tier::ORDERED, [Tier::High, Tier::Medium, Tier::Low]);
    }

    #[test]
    fn test_bucket_numbers_and_weights() {
        assert_eq!(Bucket::ClassRating.number(), 1);
        assert_eq!(Bucket::Misc.number(), 11);
        assert_eq!(Bucket::ItemType.weight(), 3);
        assert_eq!(Bucket::Thickness.weight(), 2);
        assert_eq!(Bucket::Size2.weight(), 1);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Bucket::from_label("Class Rating"), Some(Bucket::ClassRating));
        assert_eq!(Bucket::from_label("class_rating"), Some(Bucket::ClassRating));
        assert_eq!(Bucket::from_label("Ends/Finish"), Some(Bucket::EndsFinish));
        assert_eq!(Bucket::from_label("Thickness/Schedule"), Some(Bucket::Thickness));
        assert_eq!(Bucket::from_label("schedule"), Some(Bucket::Thickness));
        assert_eq!(Bucket::from_label("Size 2"), Some(Bucket::Size2));
        assert_eq!(Bucket::from_label("8"), Some(Bucket::Thickness));
        assert_eq!(Bucket::from_label("12"), None);
        assert_eq!(Bucket::from_label("colour"), None);
    }

    #[test]
    fn test_attribute_set_union_keeps_both_sides() {
        let extracted = AttributeSet::from_pairs(&[(Bucket::ItemGroup, "pipe")]);
        let hint = AttributeSet::from_pairs(&[
            (Bucket::ItemGroup, "tube"),
            (Bucket::Material, "x52"),
        ]);

        let merged = extracted.union(&hint);
        assert!(merged.contains(Bucket::ItemGroup, "pipe"));
        assert!(merged.contains(Bucket::ItemGroup, "tube"));
        assert!(merged.contains(Bucket::Material, "x52"));
        // 元の集合は変わらない
        assert_eq!(extracted.count(Bucket::ItemGroup), 1);
    }

    #[test]
    fn test_attribute_set_ignores_blank_values() {
        let set = AttributeSet::from_pairs(&[(Bucket::Misc, "  "), (Bucket::Misc, "PSL2")]);
        assert_eq!(set.count(Bucket::Misc), 1);
        assert!(set.contains(Bucket::Misc, "psl2"));
    }

    #[test]
    fn test_summary() {
        let set = AttributeSet::from_pairs(&[(Bucket::Size1, "6"), (Bucket::ItemGroup, "pipe")]);
        assert_eq!(set.summary(), "Item Group=pipe; Size 1=6");
    }
}
