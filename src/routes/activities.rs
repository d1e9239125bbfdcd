//! # 활동(Activity) 라우트 핸들러
//!
//! - `POST   /api/v1/activities/{id}/end` → 진행 중 수면 종료
//! - `DELETE /api/v1/activities/{id}`     → 활동 삭제 (세부 정보 포함)
//!
//! 활동의 소유권은 활동이 속한 세션의 가족으로 판단합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthCaregiver,
    models::*,
    routes::AppState,
    services::{projection, temporal},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// 요청한 가족의 세션에 속한 활동만 돌려줍니다.
async fn family_activity(
    pool: &SqlitePool,
    id: Uuid,
    family_id: Uuid,
) -> Result<Activity, AppError> {
    let activity = db::get_activity(pool, id).await?.ok_or(AppError::NotFound)?;
    let session = db::get_care_session(pool, activity.care_session_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if session.family_id != family_id {
        return Err(AppError::NotFound);
    }
    Ok(activity)
}

/// `POST /activities/{id}/end` — 종료된 수면 활동을 돌려줍니다.
pub async fn end_activity(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Path(id): Path<Uuid>,
    body: Option<Json<EndActivityRequest>>,
) -> Result<Json<ActivityView>, AppError> {
    let activity = family_activity(&state.pool, id, auth.family_id).await?;
    if activity.activity_type != ActivityType::Sleep {
        return Err(AppError::BadRequest(format!(
            "Only sleep activities can be ended, got {}",
            activity.activity_type.as_str()
        )));
    }

    let sleep = db::get_sleep_details(&state.pool, activity.id)
        .await?
        .ok_or(AppError::NotFound)?;

    let now = Utc::now();
    let end_time = body.and_then(|Json(req)| req.end_time).unwrap_or(now);
    if end_time < sleep.start_time {
        return Err(AppError::BadRequest("endTime is before the sleep started".to_string()));
    }

    let duration = temporal::duration_minutes(sleep.start_time, Some(end_time));
    if !db::end_sleep(&state.pool, activity.id, end_time, duration, now).await? {
        return Err(AppError::Conflict("Sleep has already ended".to_string()));
    }
    tracing::info!(activity_id = %activity.id, minutes = ?duration, "sleep ended");

    let details = db::get_details(&state.pool, &activity).await?;
    projection::activity_to_view(Some(&activity), details.as_ref())
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// 성공 시 204 No Content
pub async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let activity = family_activity(&state.pool, id, auth.family_id).await?;
    if !db::delete_activity(&state.pool, activity.id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(activity_id = %activity.id, "activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{register_family, send, test_app, Identity};
    use axum::{http::StatusCode, Router};
    use serde_json::{json, Value};

    async fn record(app: &Router, identity: &Identity, activity: Value) -> String {
        let (status, session) = send(
            app,
            "POST",
            "/api/v1/sessions/current/activities",
            identity,
            Some(json!({ "activities": [activity] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let activities = session["activities"].as_array().unwrap();
        activities[activities.len() - 1]["id"].as_str().unwrap().to_string()
    }

    fn sleep_from(start: &str) -> Value {
        json!({ "activityType": "SLEEP", "sleepDetails": { "startTime": start } })
    }

    #[tokio::test]
    async fn ends_an_active_sleep_once() {
        let (app, _) = test_app().await;
        let identity = register_family(&app, "kims").await;
        let id = record(&app, &identity, sleep_from("2024-01-01T13:00:00Z")).await;

        let uri = format!("/api/v1/activities/{id}/end");
        let (status, body) = send(
            &app,
            "POST",
            &uri,
            &identity,
            Some(json!({ "endTime": "2024-01-01T14:30:00Z" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activityType"], "SLEEP");
        assert_eq!(body["sleepDetails"]["durationMinutes"], 90);
        assert_eq!(body["sleepDetails"]["isActive"], false);

        let (status, _) = send(&app, "POST", &uri, &identity, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn only_sleep_can_be_ended() {
        let (app, _) = test_app().await;
        let identity = register_family(&app, "kims").await;
        let id = record(
            &app,
            &identity,
            json!({ "activityType": "DIAPER", "diaperDetails": { "changedAt": "2024-01-01T09:00:00Z", "hadPee": true } }),
        )
        .await;

        let (status, _) = send(&app, "POST", &format!("/api/v1/activities/{id}/end"), &identity, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_activity_from_session() {
        let (app, _) = test_app().await;
        let identity = register_family(&app, "kims").await;
        let id = record(&app, &identity, sleep_from("2024-01-01T13:00:00Z")).await;

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/activities/{id}"), &identity, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, session) = send(&app, "GET", "/api/v1/sessions/current", &identity, None).await;
        assert_eq!(session["activities"].as_array().map(Vec::len), Some(0));

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/activities/{id}"), &identity, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_family_cannot_touch_activity() {
        let (app, _) = test_app().await;
        let kims = register_family(&app, "kims").await;
        let parks = register_family(&app, "parks").await;
        let id = record(&app, &kims, sleep_from("2024-01-01T13:00:00Z")).await;

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/activities/{id}"), &parks, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "POST", &format!("/api/v1/activities/{id}/end"), &parks, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
