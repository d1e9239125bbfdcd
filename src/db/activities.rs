//! # 활동 데이터베이스 쿼리 모듈
//!
//! 활동은 `activities` 한 행 + 종류별 `*_details` 한 행으로 저장됩니다.
//! 두 행은 항상 하나의 트랜잭션으로 함께 들어갑니다.
//!
//! 저장 후 바뀔 수 있는 것은 수면의 종료 시각(과 소요 시간) 하나뿐이며,
//! 한 번 채워지면 다시 바뀌지 않습니다.

use crate::error::AppError;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// 활동과 세부 정보를 함께 저장합니다.
pub async fn create_activity_with_details(
    pool: &SqlitePool,
    record: &ActivityWithDetails,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    insert_activity(&mut tx, record).await?;
    tx.commit().await?;
    Ok(())
}

/// 여러 활동을 한 번에 저장합니다. 하나라도 실패하면 모두 롤백됩니다.
pub async fn create_activities(
    pool: &SqlitePool,
    records: &[ActivityWithDetails],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for record in records {
        insert_activity(&mut tx, record).await?;
    }
    tx.commit().await?;
    Ok(())
}

async fn insert_activity(
    tx: &mut Transaction<'_, Sqlite>,
    record: &ActivityWithDetails,
) -> Result<(), AppError> {
    let activity = &record.activity;

    sqlx::query(
        r#"
        INSERT INTO activities (id, care_session_id, activity_type, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(activity.id)
    .bind(activity.care_session_id)
    .bind(activity.activity_type)
    .bind(activity.created_at)
    .bind(activity.updated_at)
    .execute(&mut **tx)
    .await?;

    match &record.details {
        Some(ActivityDetails::Feed(d)) => {
            sqlx::query(
                r#"
                INSERT INTO feed_details
                    (id, activity_id, start_time, end_time, amount_ml, feed_type, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(d.id)
            .bind(d.activity_id)
            .bind(d.start_time)
            .bind(d.end_time)
            .bind(d.amount_ml)
            .bind(d.feed_type)
            .bind(d.created_at)
            .bind(d.updated_at)
            .execute(&mut **tx)
            .await?;
        }
        Some(ActivityDetails::Diaper(d)) => {
            sqlx::query(
                r#"
                INSERT INTO diaper_details
                    (id, activity_id, changed_at, had_poop, had_pee, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(d.id)
            .bind(d.activity_id)
            .bind(d.changed_at)
            .bind(d.had_poop)
            .bind(d.had_pee)
            .bind(d.created_at)
            .bind(d.updated_at)
            .execute(&mut **tx)
            .await?;
        }
        Some(ActivityDetails::Sleep(d)) => {
            sqlx::query(
                r#"
                INSERT INTO sleep_details
                    (id, activity_id, start_time, end_time, duration_minutes, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(d.id)
            .bind(d.activity_id)
            .bind(d.start_time)
            .bind(d.end_time)
            .bind(d.duration_minutes)
            .bind(d.created_at)
            .bind(d.updated_at)
            .execute(&mut **tx)
            .await?;
        }
        None => {}
    }

    Ok(())
}

pub async fn get_activity(pool: &SqlitePool, id: Uuid) -> Result<Option<Activity>, AppError> {
    let activity = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, care_session_id, activity_type, created_at, updated_at
        FROM activities
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(activity)
}

/// 세션의 활동을 생성 순서대로, 세부 정보와 함께 불러옵니다.
pub async fn list_activities_for_session(
    pool: &SqlitePool,
    care_session_id: Uuid,
) -> Result<Vec<ActivityWithDetails>, AppError> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, care_session_id, activity_type, created_at, updated_at
        FROM activities
        WHERE care_session_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(care_session_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(activities.len());
    for activity in activities {
        let details = get_details(pool, &activity).await?;
        result.push(ActivityWithDetails { activity, details });
    }

    Ok(result)
}

/// 활동 종류에 맞는 세부 정보 테이블만 조회합니다.
pub async fn get_details(
    pool: &SqlitePool,
    activity: &Activity,
) -> Result<Option<ActivityDetails>, AppError> {
    let details = match activity.activity_type {
        ActivityType::Feed => get_feed_details(pool, activity.id).await?.map(ActivityDetails::Feed),
        ActivityType::Diaper => get_diaper_details(pool, activity.id)
            .await?
            .map(ActivityDetails::Diaper),
        ActivityType::Sleep => get_sleep_details(pool, activity.id)
            .await?
            .map(ActivityDetails::Sleep),
    };

    Ok(details)
}

/// 활동을 삭제합니다. 세부 정보는 ON DELETE CASCADE로 함께 지워집니다.
pub async fn delete_activity(pool: &SqlitePool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_feed_details(
    pool: &SqlitePool,
    activity_id: Uuid,
) -> Result<Option<FeedDetails>, AppError> {
    let details = sqlx::query_as::<_, FeedDetails>(
        r#"
        SELECT id, activity_id, start_time, end_time, amount_ml, feed_type, created_at, updated_at
        FROM feed_details
        WHERE activity_id = ?
        "#,
    )
    .bind(activity_id)
    .fetch_optional(pool)
    .await?;

    Ok(details)
}

pub async fn get_diaper_details(
    pool: &SqlitePool,
    activity_id: Uuid,
) -> Result<Option<DiaperDetails>, AppError> {
    let details = sqlx::query_as::<_, DiaperDetails>(
        r#"
        SELECT id, activity_id, changed_at, had_poop, had_pee, created_at, updated_at
        FROM diaper_details
        WHERE activity_id = ?
        "#,
    )
    .bind(activity_id)
    .fetch_optional(pool)
    .await?;

    Ok(details)
}

pub async fn get_sleep_details(
    pool: &SqlitePool,
    activity_id: Uuid,
) -> Result<Option<SleepDetails>, AppError> {
    let details = sqlx::query_as::<_, SleepDetails>(
        r#"
        SELECT id, activity_id, start_time, end_time, duration_minutes, created_at, updated_at
        FROM sleep_details
        WHERE activity_id = ?
        "#,
    )
    .bind(activity_id)
    .fetch_optional(pool)
    .await?;

    Ok(details)
}

/// 진행 중인 수면에 종료 시각과 소요 시간을 채웁니다.
///
/// `end_time IS NULL` 조건 때문에 이미 끝난 수면은 바뀌지 않고 `false`가 반환됩니다.
pub async fn end_sleep(
    pool: &SqlitePool,
    activity_id: Uuid,
    end_time: DateTime<Utc>,
    duration_minutes: Option<i32>,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE sleep_details
        SET end_time = ?, duration_minutes = ?, updated_at = ?
        WHERE activity_id = ? AND end_time IS NULL
        "#,
    )
    .bind(end_time)
    .bind(duration_minutes)
    .bind(now)
    .bind(activity_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
