//! # 음성 입력 라우트 핸들러
//!
//! - `POST /api/v1/voice/parse`      → multipart `audio` 파일을 인식 후 해석
//! - `POST /api/v1/voice/parse-text` → `{ "text": "..." }` 문장을 바로 해석
//!
//! 해석 결과는 저장하지 않습니다. 현재 시각과 `X-Timezone` 헤더의 시간대가
//! 프롬프트에 들어가 "30분 전" 같은 상대 표현을 풀 수 있게 합니다.

use crate::{
    error::AppError,
    middleware::auth::AuthCaregiver,
    models::*,
    routes::AppState,
    services::voice,
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;

const AUDIO_FIELD: &str = "audio";
const DEFAULT_AUDIO_FILENAME: &str = "audio.m4a";

pub async fn parse_voice_input(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    mut multipart: Multipart,
) -> Result<Json<ParsedVoiceResult>, AppError> {
    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AUDIO_FILENAME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read audio: {}", e)))?;
        audio = Some((bytes.to_vec(), filename));
        break;
    }

    let (bytes, filename) =
        audio.ok_or_else(|| AppError::BadRequest("audio file is required".to_string()))?;
    tracing::info!(caregiver_id = %auth.caregiver_id, bytes = bytes.len(), %filename, "voice input received");

    let result = voice::parse_voice_audio(
        &state.whisper,
        &state.claude,
        bytes,
        &filename,
        Utc::now(),
        &auth.timezone,
    )
    .await?;
    Ok(Json(result))
}

pub async fn parse_voice_text(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Json(req): Json<ParseVoiceTextRequest>,
) -> Result<Json<ParsedVoiceResult>, AppError> {
    let result = voice::parse_voice_text(&state.claude, req.text, Utc::now(), &auth.timezone).await?;
    Ok(Json(result))
}
