//! # 문장 해석 클라이언트 (Anthropic Messages API)
//!
//! 음성 인식으로 얻은 문장을 프롬프트에 넣어 활동 JSON 배열을 추출하도록 요청합니다.
//! 응답 본문(`content[0].text`)을 그대로 돌려주며, JSON 해석은 `voice` 모듈이 맡습니다.
//!
//! 재시도는 하지 않습니다. 실패는 `AppError::Upstream` 하나로 전달됩니다.

use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;

#[derive(Clone)]
pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl ClaudeClient {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.anthropic_api_key.clone(),
            model: config.anthropic_model.clone(),
            base_url: config.anthropic_base_url.clone(),
        })
    }

    /// 문장에서 활동을 추출하고, 모델이 돌려준 원문 텍스트를 반환합니다.
    pub async fn extract_activities(
        &self,
        text: &str,
        now: DateTime<Utc>,
        timezone: &str,
    ) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("ANTHROPIC_API_KEY is not configured".to_string()))?;

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{"role": "user", "content": build_prompt(text, now, timezone)}]
        });

        tracing::debug!(model = %self.model, "requesting activity extraction");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Claude API request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "activity extraction failed");
            return Err(AppError::Upstream(format!("Claude API error {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Claude API response parse error: {e}")))?;

        json["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Upstream("No content in Claude response".to_string()))
    }
}

/// 추출 프롬프트. 현재 시각과 시간대를 함께 넣어 "지금", "2시 반에" 같은
/// 상대 표현을 절대 시각으로 풀게 합니다.
pub fn build_prompt(voice_text: &str, now: DateTime<Utc>, timezone: &str) -> String {
    format!(
        r#"You are parsing baby care voice input into structured activities.

Current time: {now}
Current timezone: {timezone}

Voice input: "{voice_text}"

Rules:
1. "now" or "right now" = current time
2. Relative times like "at 2:30" are absolute within today
3. Default feed type to "FORMULA" if not specified
4. "pooped" means had_poop=true for diaper change
5. "peed" means had_pee=true for diaper change

FEED ACTIVITIES:
- MUST have: start_time, amount_ml, feed_type
- If end_time provided: use it
- If end_time NOT provided: set to null

SLEEP ACTIVITIES:
- MUST have: start_time
- If end_time provided: use it (completed nap)
- If end_time NOT provided: set to null (ongoing/active sleep)

DIAPER ACTIVITIES:
- MUST have: changed_at timestamp
- Extract had_poop and had_pee from context

Extract all activities mentioned. Return ONLY valid JSON array (no markdown, no explanation):

[
  {{
    "activity_type": "FEED|DIAPER|SLEEP",
    "feed_details": {{
      "start_time": "2024-01-15T14:30:00Z",
      "end_time": null,
      "amount_ml": 60,
      "feed_type": "FORMULA"
    }},
    "diaper_details": {{
      "changed_at": "2024-01-15T14:55:00Z",
      "had_poop": true,
      "had_pee": true
    }},
    "sleep_details": {{
      "start_time": "2024-01-15T15:00:00Z",
      "end_time": null
    }}
  }}
]

If you cannot parse the input, return: {{"error": "reason"}}"#,
        now = now.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prompt_carries_time_zone_and_text() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let prompt = build_prompt("fed 60ml formula now", now, "America/Toronto");
        assert!(prompt.contains("Current time: 2024-01-15T14:30:00Z"));
        assert!(prompt.contains("Current timezone: America/Toronto"));
        assert!(prompt.contains(r#"Voice input: "fed 60ml formula now""#));
        assert!(prompt.contains(r#"{"error": "reason"}"#));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = ClaudeClient::from_config(&Config::for_tests()).unwrap();
        let err = client
            .extract_activities("fed 60ml", Utc::now(), "UTC")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("ANTHROPIC_API_KEY")));
    }
}
