//! 음성 인식 클라이언트 (OpenAI `/v1/audio/transcriptions`, `whisper-1`)
//!
//! 파일 이름은 형식 추정용 힌트로만 쓰입니다.

use crate::config::Config;
use crate::error::AppError;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const MODEL: &str = "whisper-1";

#[derive(Clone)]
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for WhisperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl WhisperClient {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
        })
    }

    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("OPENAI_API_KEY is not configured".to_string()))?;

        if audio.is_empty() {
            return Err(AppError::BadRequest("Audio file is empty".to_string()));
        }

        let url = format!("{}/v1/audio/transcriptions", self.base_url.trim_end_matches('/'));
        let form = Form::new()
            .text("model", MODEL)
            .part("file", Part::bytes(audio).file_name(filename.to_string()));

        tracing::debug!(filename, "requesting transcription");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to transcribe audio: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "transcription failed");
            return Err(AppError::Upstream(format!(
                "failed to transcribe audio: {status}: {text}"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Whisper response parse error: {e}")))?;

        json["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AppError::Upstream("Whisper response missing 'text' field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = WhisperClient::from_config(&Config::for_tests()).unwrap();
        let err = client.transcribe(vec![1, 2, 3], "clip.m4a").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("OPENAI_API_KEY")));
    }
}
