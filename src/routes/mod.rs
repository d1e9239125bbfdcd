//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 모든 경로는 `main.rs`에서 `/api/v1` 아래에 붙습니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인
//! - `families`: 가족 생성/참여, 이름 확인, 아기 이름 변경
//! - `caregivers`: 내 보호자 정보, 가족 탈퇴
//! - `sessions`: 돌봄 세션 조회/시작/완료, 활동 추가
//! - `activities`: 수면 종료, 활동 삭제
//! - `voice`: 음성/문장 입력 해석
//! - `predictions`: 다음 수유 예측

pub mod activities;
pub mod caregivers;
pub mod families;
pub mod health;
pub mod predictions;
pub mod sessions;
pub mod voice;

pub use activities::*;
pub use caregivers::*;
pub use families::*;
pub use health::*;
pub use predictions::*;
pub use sessions::*;
pub use voice::*;

use crate::services::{claude::ClaudeClient, whisper::WhisperClient};
use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 풀과 HTTP 클라이언트는 내부적으로 Arc라서 clone해도 같은 자원을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub whisper: WhisperClient,
    pub claude: ClaudeClient,
}

/// `/api/v1` 아래에 붙을 API 라우터
///
/// axum 0.8부터 경로 파라미터는 `{id}` 문법입니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // 가족
        .route("/families", post(create_family))
        .route("/families/available", get(check_family_name_available))
        .route("/families/join", post(join_family))
        .route("/families/me", get(get_my_family).patch(update_baby_name))
        // 보호자
        .route("/caregivers/me", get(get_my_caregiver).delete(leave_family))
        // 돌봄 세션
        .route("/sessions", post(start_care_session))
        .route("/sessions/current", get(get_current_session))
        .route("/sessions/current/activities", post(add_activities))
        .route("/sessions/recent", get(get_recent_sessions))
        .route("/sessions/{id}", get(get_care_session).delete(delete_care_session))
        .route("/sessions/{id}/complete", post(complete_care_session))
        // 활동
        .route("/activities/{id}", delete(delete_activity))
        .route("/activities/{id}/end", post(end_activity))
        // 음성 입력, 예측
        .route("/voice/parse", post(parse_voice_input))
        .route("/voice/parse-text", post(parse_voice_text))
        .route("/predictions/next-feed", get(predict_next_feed))
        .with_state(state)
}
