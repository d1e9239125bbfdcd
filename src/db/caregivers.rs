use crate::error::AppError;
use crate::models::Caregiver;
use sqlx::SqlitePool;
use uuid::Uuid;

/// 기존 가족에 보호자를 추가합니다 (가족 참여).
pub async fn create_caregiver(pool: &SqlitePool, caregiver: &Caregiver) -> Result<(), AppError> {
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
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_caregiver(pool: &SqlitePool, id: Uuid) -> Result<Option<Caregiver>, AppError> {
    let caregiver = sqlx::query_as::<_, Caregiver>(
        r#"
        SELECT id, family_id, name, device_id, device_name, created_at, updated_at
        FROM caregivers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(caregiver)
}

/// 같은 기기로 여러 번 등록했다면 가장 최근 것을 돌려줍니다.
pub async fn get_caregiver_by_device(
    pool: &SqlitePool,
    device_id: &str,
) -> Result<Option<Caregiver>, AppError> {
    let caregiver = sqlx::query_as::<_, Caregiver>(
        r#"
        SELECT id, family_id, name, device_id, device_name, created_at, updated_at
        FROM caregivers
        WHERE device_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(device_id)
    .fetch_optional(pool)
    .await?;

    Ok(caregiver)
}

/// 가족의 보호자 목록 (가입 순서)
pub async fn list_caregivers_for_family(
    pool: &SqlitePool,
    family_id: Uuid,
) -> Result<Vec<Caregiver>, AppError> {
    let caregivers = sqlx::query_as::<_, Caregiver>(
        r#"
        SELECT id, family_id, name, device_id, device_name, created_at, updated_at
        FROM caregivers
        WHERE family_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(family_id)
    .fetch_all(pool)
    .await?;

    Ok(caregivers)
}

/// 보호자를 삭제합니다. 그 보호자가 맡았던 세션도 함께 지워집니다.
pub async fn delete_caregiver(pool: &SqlitePool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM caregivers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
