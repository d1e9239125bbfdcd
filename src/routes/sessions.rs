//! # 돌봄 세션 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/sessions/current`            → 진행 중 세션 (없으면 `null`)
//! - `GET  /api/v1/sessions/recent?limit=`      → 최근 완료 세션 (기본 10개)
//! - `GET  /api/v1/sessions/{id}`               → 세션 하나
//! - `POST /api/v1/sessions`                    → 세션 시작 (이미 있으면 그 세션)
//! - `POST /api/v1/sessions/current/activities` → 활동 추가 (세션이 없으면 새로 시작)
//! - `POST /api/v1/sessions/{id}/complete`      → 세션 완료
//! - `DELETE /api/v1/sessions/{id}`             → 세션 삭제 (활동까지 함께)
//!
//! 세션 응답에는 담당 보호자, 활동 목록, 요약이 함께 들어갑니다.
//! 다른 가족의 세션은 존재하지 않는 것처럼 404로 응답합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthCaregiver,
    models::*,
    routes::AppState,
    services::{projection, recording, summary},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

const DEFAULT_RECENT_LIMIT: i64 = 10;
const MAX_RECENT_LIMIT: i64 = 100;

/// 세션 view에 보호자, 활동, 요약을 채웁니다.
pub async fn load_session_view(
    pool: &SqlitePool,
    session: &CareSession,
) -> Result<CareSessionView, AppError> {
    let mut view = projection::care_session_to_view(Some(session))
        .ok_or(AppError::Internal("Failed to project care session".to_string()))?;

    let caregiver = db::get_caregiver(pool, session.caregiver_id).await?;
    view.caregiver = projection::caregiver_to_view(caregiver.as_ref());

    let activities = db::list_activities_for_session(pool, session.id).await?;
    view.activities = projection::activities_to_views(&activities);
    view.summary = Some(summary::summarize(&view.activities));

    Ok(view)
}

/// 가족 소유 세션만 돌려줍니다.
async fn family_session(
    pool: &SqlitePool,
    id: Uuid,
    family_id: Uuid,
) -> Result<CareSession, AppError> {
    db::get_care_session(pool, id)
        .await?
        .filter(|s| s.family_id == family_id)
        .ok_or(AppError::NotFound)
}

/// 진행 중 세션을 찾고, 없으면 요청한 보호자 이름으로 새로 시작합니다.
async fn current_or_start(pool: &SqlitePool, auth: &AuthCaregiver) -> Result<CareSession, AppError> {
    if let Some(session) = db::get_in_progress_session(pool, auth.family_id).await? {
        return Ok(session);
    }

    let session = CareSession::start(auth.family_id, auth.caregiver_id, Utc::now());
    match db::create_care_session(pool, &session).await {
        Ok(()) => {
            tracing::info!(session_id = %session.id, family_id = %auth.family_id, "care session started");
            Ok(session)
        }
        // 동시에 다른 보호자가 먼저 시작한 경우 그 세션을 씁니다.
        Err(AppError::Conflict(_)) => db::get_in_progress_session(pool, auth.family_id)
            .await?
            .ok_or(AppError::Internal("In-progress session disappeared".to_string())),
        Err(e) => Err(e),
    }
}

/// `GET /sessions/current` — 진행 중 세션이 없으면 `null`
pub async fn get_current_session(
    State(state): State<AppState>,
    auth: AuthCaregiver,
) -> Result<Json<Option<CareSessionView>>, AppError> {
    let view = match db::get_in_progress_session(&state.pool, auth.family_id).await? {
        Some(session) => Some(load_session_view(&state.pool, &session).await?),
        None => None,
    };
    Ok(Json(view))
}

/// `GET /sessions/recent?limit=` — `{ "sessions": [...] }`
pub async fn get_recent_sessions(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Query(query): Query<RecentSessionsQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    let sessions = db::list_recent_sessions(&state.pool, auth.family_id, limit).await?;
    let mut views = Vec::with_capacity(sessions.len());
    for session in &sessions {
        views.push(load_session_view(&state.pool, session).await?);
    }

    Ok(Json(json!({ "sessions": views })))
}

pub async fn get_care_session(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Path(id): Path<Uuid>,
) -> Result<Json<CareSessionView>, AppError> {
    let session = family_session(&state.pool, id, auth.family_id).await?;
    Ok(Json(load_session_view(&state.pool, &session).await?))
}

/// `POST /sessions` — 이미 진행 중 세션이 있으면 새로 만들지 않고 그대로 돌려줍니다.
pub async fn start_care_session(
    State(state): State<AppState>,
    auth: AuthCaregiver,
) -> Result<Json<CareSessionView>, AppError> {
    let session = current_or_start(&state.pool, &auth).await?;
    Ok(Json(load_session_view(&state.pool, &session).await?))
}

/// `POST /sessions/current/activities`
///
/// 모든 입력을 먼저 검증하고, 하나라도 잘못되면 아무것도 저장하지 않습니다.
pub async fn add_activities(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Json(req): Json<AddActivitiesRequest>,
) -> Result<Json<CareSessionView>, AppError> {
    if req.activities.is_empty() {
        return Err(AppError::BadRequest("At least one activity is required".to_string()));
    }

    // 세션을 만들기 전에 검증하고, 세션 id는 확정된 뒤에 채웁니다.
    let now = Utc::now();
    let mut records = req
        .activities
        .iter()
        .map(|input| recording::prepare_activity(Uuid::nil(), input, now))
        .collect::<Result<Vec<_>, _>>()?;

    let session = current_or_start(&state.pool, &auth).await?;
    for record in &mut records {
        record.activity.care_session_id = session.id;
    }

    match records.as_slice() {
        [single] => db::create_activity_with_details(&state.pool, single).await?,
        _ => db::create_activities(&state.pool, &records).await?,
    }
    tracing::info!(session_id = %session.id, count = records.len(), "activities recorded");

    Ok(Json(load_session_view(&state.pool, &session).await?))
}

pub async fn complete_care_session(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Path(id): Path<Uuid>,
    body: Option<Json<CompleteSessionRequest>>,
) -> Result<Json<CareSessionView>, AppError> {
    let mut session = family_session(&state.pool, id, auth.family_id).await?;
    if session.status == SessionStatus::Completed {
        return Err(AppError::Conflict("Care session is already completed".to_string()));
    }

    let req = body.map(|Json(req)| req).unwrap_or_default();
    session.complete(req.notes, Utc::now());
    db::update_care_session(&state.pool, &session).await?;
    tracing::info!(session_id = %session.id, "care session completed");

    Ok(Json(load_session_view(&state.pool, &session).await?))
}

/// 잘못 시작한 세션을 버립니다. 활동과 세부 정보는 ON DELETE CASCADE로 함께 지워집니다.
pub async fn delete_care_session(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = family_session(&state.pool, id, auth.family_id).await?;
    if !db::delete_care_session(&state.pool, session.id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(session_id = %session.id, "care session deleted");
    Ok(StatusCode::NO_CONTENT)
}
