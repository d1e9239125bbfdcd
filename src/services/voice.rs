//! # 음성 입력 해석 파이프라인
//!
//! ```text
//! 오디오 ─ whisper ─▶ 문장 ─ claude ─▶ JSON 텍스트 ─ interpret ─▶ ParsedVoiceResult
//! ```
//!
//! 해석 결과는 저장하지 않습니다. 클라이언트가 확인한 뒤
//! `POST /sessions/current/activities`로 따로 저장합니다.
//!
//! 결과 규칙:
//! - JSON 배열 → 레코드별 디코딩. 일부 레코드가 거부돼도 `success: true`이고
//!   거부 사유는 `errors`에 담깁니다.
//! - `{"error": "..."}` 객체 → `success: false`, `errors: [사유]`
//! - 그 밖의 텍스트 → `success: false`, `errors: [JSON 파싱 에러]`

use crate::error::AppError;
use crate::models::ParsedVoiceResult;
use crate::services::claude::ClaudeClient;
use crate::services::decoder;
use crate::services::whisper::WhisperClient;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// 오디오부터 시작하는 전체 파이프라인
pub async fn parse_voice_audio(
    whisper: &WhisperClient,
    claude: &ClaudeClient,
    audio: Vec<u8>,
    filename: &str,
    now: DateTime<Utc>,
    timezone: &str,
) -> Result<ParsedVoiceResult, AppError> {
    let text = whisper.transcribe(audio, filename).await?;
    tracing::info!(chars = text.len(), "audio transcribed");
    parse_voice_text(claude, text, now, timezone).await
}

/// 이미 문장으로 바뀐 입력을 해석합니다.
pub async fn parse_voice_text(
    claude: &ClaudeClient,
    text: String,
    now: DateTime<Utc>,
    timezone: &str,
) -> Result<ParsedVoiceResult, AppError> {
    if text.trim().is_empty() {
        return Ok(failed(text, vec!["No speech detected".to_string()]));
    }
    let output = claude.extract_activities(&text, now, timezone).await?;
    Ok(interpret_extraction(text, &output))
}

/// 추출 결과 텍스트를 해석합니다. 네트워크와 무관한 순수 함수입니다.
pub fn interpret_extraction(raw_text: String, output: &str) -> ParsedVoiceResult {
    let body = strip_code_fences(output);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(records)) => {
            let decoded = decoder::decode_parsed_activities(&records);
            if !decoded.errors.is_empty() {
                tracing::warn!(rejected = decoded.errors.len(), "some extracted activities were rejected");
            }
            ParsedVoiceResult {
                success: true,
                errors: (!decoded.errors.is_empty()).then_some(decoded.errors),
                parsed_activities: decoded.records,
                raw_text,
            }
        }
        Ok(Value::Object(object)) => {
            let reason = object
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Unexpected response from activity extraction")
                .to_string();
            failed(raw_text, vec![reason])
        }
        Ok(_) => failed(
            raw_text,
            vec!["Unexpected response from activity extraction".to_string()],
        ),
        Err(e) => {
            tracing::warn!(error = %e, "extraction output is not valid JSON");
            failed(raw_text, vec![format!("Failed to parse activities: {}", e)])
        }
    }
}

fn failed(raw_text: String, errors: Vec<String>) -> ParsedVoiceResult {
    ParsedVoiceResult {
        success: false,
        errors: Some(errors),
        parsed_activities: Vec::new(),
        raw_text,
    }
}

/// 모델이 지시를 어기고 ```json ... ``` 로 감싸 보내는 경우를 벗겨냅니다.
fn strip_code_fences(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 첫 줄의 언어 표시(json 등)는 버립니다.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;

    #[test]
    fn array_output_decodes_activities() {
        let output = r#"[
            {"activity_type": "FEED", "feed_details": {"start_time": "2024-01-15T14:30:00Z", "end_time": null, "amount_ml": 60, "feed_type": "FORMULA"}},
            {"activity_type": "DIAPER", "diaper_details": {"changed_at": "2024-01-15T14:55:00Z", "had_poop": true, "had_pee": true}}
        ]"#;

        let result = interpret_extraction("fed 60 and changed".to_string(), output);
        assert!(result.success);
        assert_eq!(result.errors, None);
        let types: Vec<_> = result.parsed_activities.iter().map(|a| a.activity_type()).collect();
        assert_eq!(types, vec![Some(ActivityType::Feed), Some(ActivityType::Diaper)]);
        assert_eq!(result.raw_text, "fed 60 and changed");
    }

    #[test]
    fn mixed_batch_returns_activities_and_reasons() {
        let output = r#"[{"activity_type": "SLEEP", "sleep_details": {"start_time": "2024-01-15T15:00:00Z"}}, {"sleep_details": {}}]"#;

        let result = interpret_extraction("nap".to_string(), output);
        assert!(result.success);
        assert_eq!(result.parsed_activities.len(), 1);
        assert_eq!(result.errors, Some(vec!["Missing activity_type".to_string()]));
    }

    #[test]
    fn error_object_fails_with_reason() {
        let result = interpret_extraction("hmm".to_string(), r#"{"error": "no activities mentioned"}"#);
        assert!(!result.success);
        assert_eq!(result.errors, Some(vec!["no activities mentioned".to_string()]));
        assert!(result.parsed_activities.is_empty());
    }

    #[test]
    fn prose_output_fails_with_parse_error() {
        let result = interpret_extraction("hmm".to_string(), "Sorry, I could not help.");
        assert!(!result.success);
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to parse activities"));
    }

    #[test]
    fn fenced_output_is_unwrapped() {
        let output = "```json\n[{\"activity_type\": \"DIAPER\", \"diaper_details\": {\"had_pee\": true}}]\n```";
        let result = interpret_extraction("wet diaper".to_string(), output);
        assert!(result.success);
        assert_eq!(result.parsed_activities.len(), 1);
    }

    #[test]
    fn fence_stripping_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2] "), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }
}
