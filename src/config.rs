use crate::ai_provider::AiProvider;
use crate::error::{BomError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// ヒントのタイムアウトを上書きする環境変数（秒）
pub const HINT_TIMEOUT_ENV: &str = "RFP_BOM_HINT_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ヒントに使うAI CLI（未設定ならヒントなし）
    pub hint_provider: Option<AiProvider>,
    pub hint_timeout_seconds: u64,
    /// 同時に実行するヒント呼び出し数
    pub hint_concurrency: usize,
    /// 結果に載せる次点候補数
    pub alternatives: usize,
    /// 照合スレッド数（未設定ならrayonの既定）
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hint_provider: None,
            hint_timeout_seconds: 20,
            hint_concurrency: 4,
            alternatives: rfp_bom_common::DEFAULT_ALTERNATIVES,
            threads: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BomError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("rfp-bom").join("config.json"))
    }

    /// ヒントのタイムアウト（環境変数を優先）
    pub fn hint_timeout(&self) -> Duration {
        let seconds = std::env::var(HINT_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(self.hint_timeout_seconds);
        Duration::from_secs(seconds)
    }

    pub fn set_hint_provider(&mut self, provider: Option<AiProvider>) -> Result<()> {
        self.hint_provider = provider;
        self.save()
    }

    pub fn set_hint_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(BomError::Config("タイムアウトは1秒以上を指定してください".into()));
        }
        self.hint_timeout_seconds = seconds;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hint_provider, None);
        assert_eq!(config.hint_timeout_seconds, 20);
        assert_eq!(config.hint_concurrency, 4);
        assert_eq!(config.alternatives, 3);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"hint_provider": "gemini"}"#).unwrap();
        assert_eq!(config.hint_provider, Some(AiProvider::Gemini));
        assert_eq!(config.hint_timeout_seconds, 20);
        assert_eq!(config.alternatives, 3);
    }

    #[test]
    fn test_roundtrip_json() {
        let config = Config {
            hint_provider: Some(AiProvider::Claude),
            hint_timeout_seconds: 5,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"hint_provider\":\"claude\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
