//! # 돌봄 세션 데이터베이스 쿼리 모듈
//!
//! ## 세션 라이프사이클
//! ```text
//! create_care_session() → in_progress (completed_at = NULL) → complete_care_session() → completed
//! ```
//!
//! 가족당 진행 중 세션은 하나뿐이라는 규칙은 부분 UNIQUE 인덱스가 지킵니다.
//! 두 번째 진행 중 세션을 넣으려 하면 `AppError::Conflict`가 됩니다.

use crate::error::AppError;
use crate::models::{CareSession, SessionStatus};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn create_care_session(pool: &SqlitePool, session: &CareSession) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO care_sessions
            (id, caregiver_id, family_id, status, started_at, completed_at, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.id)
    .bind(session.caregiver_id)
    .bind(session.family_id)
    .bind(session.status)
    .bind(session.started_at)
    .bind(session.completed_at)
    .bind(&session.notes)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            AppError::Conflict("Family already has a session in progress".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(())
}

pub async fn get_care_session(pool: &SqlitePool, id: Uuid) -> Result<Option<CareSession>, AppError> {
    let session = sqlx::query_as::<_, CareSession>(
        r#"
        SELECT id, caregiver_id, family_id, status, started_at, completed_at, notes, created_at, updated_at
        FROM care_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 가족의 진행 중 세션. 없으면 에러가 아니라 None입니다.
pub async fn get_in_progress_session(
    pool: &SqlitePool,
    family_id: Uuid,
) -> Result<Option<CareSession>, AppError> {
    let session = sqlx::query_as::<_, CareSession>(
        r#"
        SELECT id, caregiver_id, family_id, status, started_at, completed_at, notes, created_at, updated_at
        FROM care_sessions
        WHERE family_id = ? AND status = ?
        LIMIT 1
        "#,
    )
    .bind(family_id)
    .bind(SessionStatus::InProgress)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 최근 완료된 세션 (최신 시작 순)
pub async fn list_recent_sessions(
    pool: &SqlitePool,
    family_id: Uuid,
    limit: i64,
) -> Result<Vec<CareSession>, AppError> {
    let sessions = sqlx::query_as::<_, CareSession>(
        r#"
        SELECT id, caregiver_id, family_id, status, started_at, completed_at, notes, created_at, updated_at
        FROM care_sessions
        WHERE family_id = ? AND status = ?
        ORDER BY started_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(family_id)
    .bind(SessionStatus::Completed)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// 세션의 상태, 완료 시각, 메모를 저장합니다. 나머지 필드는 바뀌지 않습니다.
pub async fn update_care_session(pool: &SqlitePool, session: &CareSession) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE care_sessions
        SET status = ?, completed_at = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(session.status)
    .bind(session.completed_at)
    .bind(&session.notes)
    .bind(session.updated_at)
    .bind(session.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_care_session(pool: &SqlitePool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM care_sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_family, test_pool};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn no_session_in_progress_is_none() {
        let pool = test_pool().await;
        let (family, _) = seed_family(&pool, "kims").await;
        assert!(get_in_progress_session(&pool, family.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn only_one_session_in_progress_per_family() {
        let pool = test_pool().await;
        let (family, caregiver) = seed_family(&pool, "kims").await;

        let first = CareSession::start(family.id, caregiver.id, Utc::now());
        create_care_session(&pool, &first).await.unwrap();
        assert_eq!(
            get_in_progress_session(&pool, family.id).await.unwrap().map(|s| s.id),
            Some(first.id)
        );

        let second = CareSession::start(family.id, caregiver.id, Utc::now());
        let err = create_care_session(&pool, &second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn completed_sessions_are_listed_newest_first() {
        let pool = test_pool().await;
        let (family, caregiver) = seed_family(&pool, "kims").await;
        let base = Utc::now() - Duration::hours(10);

        let mut ids = Vec::new();
        for hour in 0..3 {
            let started = base + Duration::hours(hour);
            let mut session = CareSession::start(family.id, caregiver.id, started);
            create_care_session(&pool, &session).await.unwrap();
            session.complete(None, started + Duration::minutes(30));
            assert!(update_care_session(&pool, &session).await.unwrap());
            ids.push(session.id);
        }
        // 진행 중인 세션은 목록에 나오지 않습니다.
        let open = CareSession::start(family.id, caregiver.id, Utc::now());
        create_care_session(&pool, &open).await.unwrap();

        let recent = list_recent_sessions(&pool, family.id, 2).await.unwrap();
        let recent_ids: Vec<_> = recent.iter().map(|s| s.id).collect();
        assert_eq!(recent_ids, vec![ids[2], ids[1]]);
        assert!(recent.iter().all(|s| s.completed_at.is_some()));
    }

    #[tokio::test]
    async fn completing_persists_status_and_notes() {
        let pool = test_pool().await;
        let (family, caregiver) = seed_family(&pool, "kims").await;
        let mut session = CareSession::start(family.id, caregiver.id, Utc::now());
        create_care_session(&pool, &session).await.unwrap();

        session.complete(Some("good night".to_string()), Utc::now());
        update_care_session(&pool, &session).await.unwrap();

        let stored = get_care_session(&pool, session.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Completed);
        assert!(stored.completed_at.is_some());
        assert_eq!(stored.notes.as_deref(), Some("good night"));
        assert!(get_in_progress_session(&pool, family.id).await.unwrap().is_none());

        assert!(delete_care_session(&pool, session.id).await.unwrap());
        assert!(get_care_session(&pool, session.id).await.unwrap().is_none());
    }
}
