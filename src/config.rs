//! # 애플리케이션 설정(Configuration) 모듈
//!
//! `.env` 파일이나 시스템 환경변수에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소 (기본값 `0.0.0.0:8080`)
//! - `ANTHROPIC_API_KEY` (없으면 `CLAUDE_API_KEY`): 문장 해석용 키
//! - `ANTHROPIC_MODEL`, `ANTHROPIC_BASE_URL`: 문장 해석 모델과 주소
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`: 음성 인식(Whisper)용 키와 주소
//! - `AI_TIMEOUT_SECS`: 외부 호출 타임아웃 (기본값 30초)
//! - `CORS_ORIGIN`: 허용할 출처. 없으면 모두 허용
//!
//! AI 키가 없어도 서버는 뜹니다. 음성 해석 요청만 502로 실패합니다.

use std::env;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽어서 `AppState`로 공유합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 예: "sqlite:data/babybaton.db?mode=rwc"
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub ai_timeout_secs: u64,
    pub cors_origin: Option<String>,
}

impl Config {
    /// 환경변수에서 설정을 읽습니다. `DATABASE_URL`만 필수입니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY").or_else(|| non_empty("CLAUDE_API_KEY")),
            anthropic_model: non_empty("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            anthropic_base_url: non_empty("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ai_timeout_secs: env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            cors_origin: non_empty("CORS_ORIGIN"),
        })
    }
}

// 빈 문자열은 설정하지 않은 것으로 봅니다.
fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    /// 테스트용 설정 (메모리 DB, AI 키 없음)
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            anthropic_api_key: None,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            ai_timeout_secs: 5,
            cors_origin: None,
        }
    }
}
