//! AI CLI連携
//!
//! claude / codex / gemini を非対話モードで起動し、標準出力のJSONをヒントとして読む。
//! プロセスは future が破棄されると kill される（タイムアウト時も残らない）。

use super::HintProvider;
use crate::ai_provider::AiProvider;
use rfp_bom_common::{build_hint_prompt, parse_hint_response, AttributeSet, Error, Result};
use tokio::process::Command;

#[derive(Debug, Clone, Copy)]
pub struct CliHintProvider {
    provider: AiProvider,
}

impl CliHintProvider {
    pub fn new(provider: AiProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> AiProvider {
        self.provider
    }

    fn command(&self, prompt: &str) -> Command {
        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.args(["/c", self.provider.command_name()]);
            c
        };

        #[cfg(not(windows))]
        let mut command = Command::new(self.provider.command_name());

        command
            .args(self.provider.prompt_args(prompt))
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);
        command
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        let output = self.command(prompt).output().await.map_err(|e| {
            Error::HintUnavailable(format!("{} CLI実行エラー: {}", self.provider, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::HintUnavailable(format!(
                "{} CLI failed (code {:?}): {}",
                self.provider,
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl HintProvider for CliHintProvider {
    async fn interpret(&self, text: &str) -> Result<Option<AttributeSet>> {
        // 改行はスペースにしてコマンドライン引数で渡す
        let prompt = build_hint_prompt(text).replace('\n', " ");
        let response = self.run(&prompt).await?;

        tracing::debug!(
            provider = %self.provider,
            chars = response.len(),
            "hint response received"
        );

        parse_hint_response(&response)
            .map_err(|e| Error::HintUnavailable(format!("hint response unreadable: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_program() {
        let provider = CliHintProvider::new(AiProvider::Gemini);
        assert_eq!(provider.provider(), AiProvider::Gemini);
        let command = provider.command("prompt");
        let program = command.as_std().get_program().to_string_lossy().to_string();
        #[cfg(not(windows))]
        assert_eq!(program, "gemini");
        #[cfg(windows)]
        assert_eq!(program, "cmd");
    }
}
