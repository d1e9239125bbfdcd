//! # 활동(Activity) 도메인 모델
//!
//! 돌봄 세션 안에서 기록되는 개별 활동(수유, 기저귀, 수면)을 정의합니다.
//!
//! 활동은 **태그된 합 타입(tagged union)** 입니다:
//! - `Activity`: 공통 봉투(envelope) — id, 세션 id, 타입 태그, 생성 시각
//! - `ActivityDetails`: 태그에 따라 정확히 하나가 붙는 세부 정보
//!
//! DB에는 `activities` 한 행과 `*_details` 테이블 한 행이 함께 저장됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 활동 종류 — 닫힌 집합 {feed, diaper, sleep}
///
/// DB에는 소문자(`feed`)로, API에는 대문자(`FEED`)로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "snake_case")]
pub enum ActivityType {
    Feed,
    Diaper,
    Sleep,
}

impl ActivityType {
    pub const ALL: [ActivityType; 3] = [ActivityType::Feed, ActivityType::Diaper, ActivityType::Sleep];

    /// 태그 문자열을 활동 종류로 해석합니다. 대소문자는 구분하지 않습니다.
    ///
    /// 알 수 없는 태그는 에러가 아니라 `None`입니다. 호출하는 쪽이
    /// 보고할지, 조용히 넘어갈지를 결정합니다.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
    }

    /// DB 저장 형식 (`feed`, `diaper`, `sleep`)
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Feed => "feed",
            ActivityType::Diaper => "diaper",
            ActivityType::Sleep => "sleep",
        }
    }

    /// API 표현 (`FEED`, `DIAPER`, `SLEEP`)
    pub fn api_name(self) -> &'static str {
        match self {
            ActivityType::Feed => "FEED",
            ActivityType::Diaper => "DIAPER",
            ActivityType::Sleep => "SLEEP",
        }
    }
}

/// 수유 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "snake_case")]
pub enum FeedType {
    BreastMilk,
    Formula,
}

impl FeedType {
    /// `breast_milk` / `BREAST_MILK` / `formula` 등을 대소문자 구분 없이 해석합니다.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("breast_milk") {
            Some(FeedType::BreastMilk)
        } else if tag.eq_ignore_ascii_case("formula") {
            Some(FeedType::Formula)
        } else {
            None
        }
    }
}

/// 활동 봉투 — DB의 `activities` 테이블 한 행
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub care_session_id: Uuid,
    pub activity_type: ActivityType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FeedDetails {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// None이면 아직 기록이 끝나지 않은 수유
    pub end_time: Option<DateTime<Utc>>,
    pub amount_ml: Option<i32>,
    pub feed_type: Option<FeedType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DiaperDetails {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub changed_at: DateTime<Utc>,
    pub had_poop: bool,
    pub had_pee: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 수면 세부 정보
///
/// `end_time`이 None이면 아직 자는 중입니다. 종료 시각은 나중에 한 번만
/// 채워질 수 있습니다 (active → completed, 되돌릴 수 없음).
/// `duration_minutes`는 종료 시점에 함께 저장되지만, API로 내보낼 때는
/// 항상 시작/종료 시각에서 다시 계산합니다.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SleepDetails {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 활동 종류별 세부 정보 — 정확히 하나의 variant만 존재합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityDetails {
    Feed(FeedDetails),
    Diaper(DiaperDetails),
    Sleep(SleepDetails),
}

impl ActivityDetails {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityDetails::Feed(_) => ActivityType::Feed,
            ActivityDetails::Diaper(_) => ActivityType::Diaper,
            ActivityDetails::Sleep(_) => ActivityType::Sleep,
        }
    }
}

/// 활동 하나와 그 세부 정보 (세부 정보 행이 없을 수도 있음)
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityWithDetails {
    pub activity: Activity,
    pub details: Option<ActivityDetails>,
}

// ── 입력 형태(input shape) ──
// 저장 계층으로 향하는 세부 정보입니다. 시각 필드가 Option인 이유는
// 음성 해석 결과에서 필드가 빠질 수 있기 때문이며, 저장 직전에 검증합니다.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDetailsInput {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount_ml: Option<i32>,
    #[serde(default)]
    pub feed_type: Option<FeedType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperDetailsInput {
    #[serde(default)]
    pub changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub had_poop: bool,
    /// 기본값 false가 아닌 "명시되지 않음"을 보존합니다.
    #[serde(default)]
    pub had_pee: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDetailsInput {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// 저장용 활동 입력 — `POST /sessions/current/activities` 본문의 원소이자
/// 음성 해석 결과의 저장용 변환 결과입니다.
pub type ActivityInput =
    crate::services::dispatch::ActivityRecord<FeedDetailsInput, DiaperDetailsInput, SleepDetailsInput>;

#[derive(Debug, Deserialize)]
pub struct AddActivitiesRequest {
    pub activities: Vec<ActivityInput>,
}

/// 수면 종료 요청 — `POST /api/v1/activities/{id}/end`
///
/// 본문이 없거나 `endTime`이 빠지면 서버의 현재 시각을 씁니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndActivityRequest {
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// 이미 문장으로 바뀐 음성 입력 — `POST /api/v1/voice/parse-text`
#[derive(Debug, Deserialize)]
pub struct ParseVoiceTextRequest {
    pub text: String,
}
