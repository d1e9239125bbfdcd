//! # 돌봄 세션 모델
//!
//! 한 명의 보호자가 아기를 맡은 한 구간을 "돌봄 세션"으로 기록합니다.
//!
//! ## 세션 흐름
//! ```text
//! [시작] in_progress (completed_at = NULL) → complete → [종료] completed
//! ```
//! 가족당 진행 중인 세션은 최대 하나입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 세션 상태 — 정확히 두 가지만 존재합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// DB의 `care_sessions` 테이블 한 행
///
/// 불변식: `completed_at`은 `status == Completed`일 때만 Some입니다.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CareSession {
    pub id: Uuid,
    pub caregiver_id: Uuid,
    pub family_id: Uuid,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CareSession {
    /// 새 진행 중 세션을 만듭니다 (아직 저장되지 않은 상태).
    pub fn start(family_id: Uuid, caregiver_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            caregiver_id,
            family_id,
            status: SessionStatus::InProgress,
            started_at: now,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 세션을 완료 상태로 전환합니다. 상태와 완료 시각은 항상 함께 바뀝니다.
    pub fn complete(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = now;
    }
}

/// 세션 완료 요청 — `POST /api/v1/sessions/{id}/complete`
#[derive(Debug, Default, Deserialize)]
pub struct CompleteSessionRequest {
    pub notes: Option<String>,
}

/// `GET /api/v1/sessions/recent?limit=`
#[derive(Debug, Deserialize)]
pub struct RecentSessionsQuery {
    pub limit: Option<i64>,
}
