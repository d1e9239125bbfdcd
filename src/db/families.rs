//! # 가족 데이터베이스 쿼리 모듈
//!
//! 가족은 첫 보호자와 함께 만들어집니다. 두 행은 하나의 트랜잭션으로 저장되므로
//! 보호자 없는 가족이 남는 일은 없습니다.

use crate::error::AppError;
use crate::models::{Caregiver, Family};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// 가족과 첫 보호자를 함께 저장합니다.
///
/// 이름이 이미 있으면 `AppError::Conflict`입니다 (UNIQUE 제약).
pub async fn create_family_with_caregiver(
    pool: &SqlitePool,
    family: &Family,
    caregiver: &Caregiver,
) -> Result<(), AppError> {
    // pool.begin(): 트랜잭션 시작. commit() 전에 drop되면 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO families (id, name, password_hash, password, baby_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(family.id)
    .bind(&family.name)
    .bind(&family.password_hash)
    .bind(&family.password)
    .bind(&family.baby_name)
    .bind(family.created_at)
    .bind(family.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| unique_to_conflict(e, "Family name already taken"))?;

    sqlx::query(
        r#"
        INSERT INTO caregivers (id, family_id, name, device_id, device_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(caregiver.id)
    .bind(caregiver.family_id)
    .bind(&caregiver.name)
    .bind(&caregiver.device_id)
    .bind(&caregiver.device_name)
    .bind(caregiver.created_at)
    .bind(caregiver.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn get_family(pool: &SqlitePool, id: Uuid) -> Result<Option<Family>, AppError> {
    let family = sqlx::query_as::<_, Family>(
        r#"
        SELECT id, name, password_hash, password, baby_name, created_at, updated_at
        FROM families
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(family)
}

pub async fn get_family_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Family>, AppError> {
    let family = sqlx::query_as::<_, Family>(
        r#"
        SELECT id, name, password_hash, password, baby_name, created_at, updated_at
        FROM families
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(family)
}

pub async fn family_name_exists(pool: &SqlitePool, name: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

/// 아기 이름을 바꾸고 갱신된 가족을 돌려줍니다. 가족이 없으면 None.
pub async fn update_baby_name(
    pool: &SqlitePool,
    id: Uuid,
    baby_name: &str,
    now: DateTime<Utc>,
) -> Result<Option<Family>, AppError> {
    let result = sqlx::query("UPDATE families SET baby_name = ?, updated_at = ? WHERE id = ?")
        .bind(baby_name)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_family(pool, id).await
}

/// 가족을 삭제합니다. 보호자, 세션, 활동은 ON DELETE CASCADE로 함께 지워집니다.
pub async fn delete_family(pool: &SqlitePool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM families WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// UNIQUE 제약 위반만 409로 바꾸고 나머지는 그대로 DB 에러로 둡니다.
fn unique_to_conflict(e: sqlx::Error, message: &str) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AppError::Conflict(message.to_string()),
        _ => AppError::Database(e),
    }
}
