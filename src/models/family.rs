use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    /// argon2 해시 — 가족 참여 시 검증용
    pub password_hash: String,
    /// 공유용 평문 비밀번호 (API로도 평문 노출, DESIGN.md 참고)
    pub password: String,
    pub baby_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Caregiver {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub device_id: String,
    pub device_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyRequest {
    pub family_name: String,
    pub password: String,
    pub baby_name: String,
    pub caregiver_name: String,
    pub device_id: String,
    pub device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinFamilyRequest {
    pub family_name: String,
    pub password: String,
    pub caregiver_name: String,
    pub device_id: String,
    pub device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBabyNameRequest {
    pub baby_name: String,
}

#[derive(Debug, Deserialize)]
pub struct FamilyNameQuery {
    pub name: String,
}
