//! RFP BOM Common Library
//!
//! RFP明細と在庫マスタを照合するエンジン（I/Oなし・同期のみ）

pub mod bucket;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod normalizer;
pub mod parser;
pub mod prompts;
pub mod rules;
pub mod scorer;
pub mod types;

pub use bucket::{AttributeSet, Bucket, Tier};
pub use catalog::{CatalogIndex, CatalogRecord, CatalogStats};
pub use classifier::{classify, confidence_for, Classification};
pub use error::{Error, Result};
pub use filter::{filter, CandidateSet, TierAction, TierTrace};
pub use matcher::{match_line, pick_best, DEFAULT_ALTERNATIVES};
pub use normalizer::{normalize, NormalizedText};
pub use parser::{extract_json, parse_hint_response};
pub use prompts::build_hint_prompt;
pub use rules::{canonicalize_hint, extract, extract_text};
pub use scorer::{bucket_breakdown, score, similarity, BucketScore};
pub use types::{Alternative, BomSummary, Confidence, MatchResult, MatchStatus};
