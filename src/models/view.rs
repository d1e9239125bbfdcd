//! # API 응답 형태(view) 정의
//!
//! 클라이언트에 내보내는 JSON 구조체들입니다. 도메인 모델(`Family`,
//! `CareSession`, `FeedDetails` 등)은 `services::projection`을 거쳐
//! 이 형태로 변환됩니다.
//!
//! - 식별자(UUID)는 표준 문자열 형태로 내보냅니다.
//! - 소요 시간(`durationMinutes`)과 수면 중 여부(`isActive`)는 저장된 값이
//!   아니라 항상 시작/종료 시각에서 계산된 값입니다.
//! - 필드 이름은 camelCase입니다 (모바일 클라이언트 규약).

use crate::models::{FeedType, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyView {
    pub id: String,
    pub name: String,
    pub baby_name: String,
    /// 공유용 평문 비밀번호. 전송 구간(HTTPS)을 기밀성 경계로 봅니다.
    pub password: String,
    pub created_at: DateTime<Utc>,
    /// 별도로 조회해 채웁니다. 프로젝션 직후에는 비어 있습니다.
    pub caregivers: Vec<CaregiverView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverView {
    pub id: String,
    pub family_id: String,
    pub name: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareSessionView {
    pub id: String,
    pub family_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    // 아래 세 필드는 프로젝션 이후 연관 데이터를 불러와 채웁니다.
    pub caregiver: Option<CaregiverView>,
    pub activities: Vec<ActivityView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CareSessionSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareSessionSummary {
    pub total_feeds: i32,
    pub total_ml: i32,
    pub total_diaper_changes: i32,
    pub total_sleep_minutes: i32,
    pub last_feed_time: Option<DateTime<Utc>>,
    pub last_sleep_time: Option<DateTime<Utc>>,
    pub currently_asleep: bool,
}

/// 수유 세부 정보 (API 형태)
///
/// `start_time`이 Option인 이유: 음성 해석 결과를 바로 보여줄 때는
/// 시작 시각이 빠져 있을 수 있습니다. 저장된 기록에서는 항상 Some입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDetailsView {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub amount_ml: Option<i32>,
    pub feed_type: Option<FeedType>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperDetailsView {
    pub changed_at: Option<DateTime<Utc>>,
    pub had_poop: bool,
    pub had_pee: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDetailsView {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    /// 종료 시각이 없으면 true. "아직 자는 중"과 "알 수 없음"을 구분하기 위해
    /// 항상 채웁니다.
    pub is_active: bool,
}

/// 저장된 활동의 API 형태 — 활동 종류별 래퍼 타입
///
/// `{"activityType": "FEED", "id": ..., "createdAt": ..., "feedDetails": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "activityType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityView {
    Feed(FeedActivityView),
    Diaper(DiaperActivityView),
    Sleep(SleepActivityView),
}

#[cfg(test)]
impl ActivityView {
    pub fn activity_type(&self) -> crate::models::ActivityType {
        use crate::models::ActivityType;
        match self {
            ActivityView::Feed(_) => ActivityType::Feed,
            ActivityView::Diaper(_) => ActivityType::Diaper,
            ActivityView::Sleep(_) => ActivityType::Sleep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedActivityView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub feed_details: Option<FeedDetailsView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperActivityView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub diaper_details: Option<DiaperDetailsView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepActivityView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub sleep_details: Option<SleepDetailsView>,
}

/// 음성 해석 결과를 화면 표시용으로 변환한 활동 (저장 전)
pub type ParsedActivity =
    crate::services::dispatch::ActivityRecord<FeedDetailsView, DiaperDetailsView, SleepDetailsView>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedVoiceResult {
    pub success: bool,
    pub errors: Option<Vec<String>>,
    pub parsed_activities: Vec<ParsedActivity>,
    pub raw_text: String,
}

/// 고정 간격 예측만 있으므로 지금은 `HIGH` 하나뿐입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionConfidence {
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextFeedPrediction {
    pub predicted_time: DateTime<Utc>,
    pub confidence: PredictionConfidence,
    pub minutes_until_feed: i32,
    pub reasoning: Option<String>,
}

/// 가족 생성/참여 결과
///
/// 비밀번호 불일치, 이름 중복 같은 "예상된 실패"는 HTTP 에러가 아니라
/// `success: false`와 `error` 메시지로 돌려줍니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub success: bool,
    pub error: Option<String>,
    pub family: Option<FamilyView>,
    pub caregiver: Option<CaregiverView>,
}

impl AuthResult {
    pub fn ok(family: FamilyView, caregiver: CaregiverView) -> Self {
        Self {
            success: true,
            error: None,
            family: Some(family),
            caregiver: Some(caregiver),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            family: None,
            caregiver: None,
        }
    }
}
