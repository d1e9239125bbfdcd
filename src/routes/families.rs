//! # 가족(Family) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET   /api/v1/families/available?name=` → 가족 이름 사용 가능 여부
//! - `POST  /api/v1/families`                  → 가족 생성 (첫 보호자 포함)
//! - `POST  /api/v1/families/join`             → 이름 + 비밀번호로 가족 참여
//! - `GET   /api/v1/families/me`               → 내 가족 (보호자 목록 포함)
//! - `PATCH /api/v1/families/me`               → 아기 이름 변경
//!
//! 생성/참여는 `AuthResult`를 돌려줍니다. 이름 중복, 비밀번호 불일치처럼
//! 사용자가 고칠 수 있는 실패는 HTTP 에러가 아니라 `success: false`입니다.
//! 응답의 `family.id`와 `caregiver.id`를 이후 요청의 신원 헤더로 씁니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthCaregiver,
    models::*,
    routes::AppState,
    services::{password, projection},
};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

/// `GET /families/available?name=` — `{ "available": bool }`
pub async fn check_family_name_available(
    State(state): State<AppState>,
    Query(query): Query<FamilyNameQuery>,
) -> Result<Json<Value>, AppError> {
    let name = required(&query.name, "name")?;
    let taken = db::family_name_exists(&state.pool, name).await?;
    Ok(Json(json!({ "available": !taken })))
}

pub async fn create_family(
    State(state): State<AppState>,
    Json(req): Json<CreateFamilyRequest>,
) -> Result<Json<AuthResult>, AppError> {
    let family_name = required(&req.family_name, "familyName")?;
    let family_password = required(&req.password, "password")?;
    let baby_name = required(&req.baby_name, "babyName")?;
    let caregiver_name = required(&req.caregiver_name, "caregiverName")?;
    let device_id = required(&req.device_id, "deviceId")?;

    if db::family_name_exists(&state.pool, family_name).await? {
        return Ok(Json(AuthResult::failed("Family name already taken")));
    }

    let now = Utc::now();
    let family = Family {
        id: Uuid::now_v7(),
        name: family_name.to_string(),
        password_hash: password::hash_password(family_password)?,
        password: family_password.to_string(),
        baby_name: baby_name.to_string(),
        created_at: now,
        updated_at: now,
    };
    let caregiver = new_caregiver(family.id, caregiver_name, device_id, req.device_name.as_deref());

    match db::create_family_with_caregiver(&state.pool, &family, &caregiver).await {
        Ok(()) => {}
        // 확인과 저장 사이에 같은 이름이 먼저 들어온 경우
        Err(AppError::Conflict(msg)) => return Ok(Json(AuthResult::failed(msg))),
        Err(e) => return Err(e),
    }

    tracing::info!(family_id = %family.id, "family created");
    Ok(Json(auth_success(&family, &caregiver)))
}

pub async fn join_family(
    State(state): State<AppState>,
    Json(req): Json<JoinFamilyRequest>,
) -> Result<Json<AuthResult>, AppError> {
    let family_name = required(&req.family_name, "familyName")?;
    let caregiver_name = required(&req.caregiver_name, "caregiverName")?;
    let device_id = required(&req.device_id, "deviceId")?;

    let Some(family) = db::get_family_by_name(&state.pool, family_name).await? else {
        return Ok(Json(AuthResult::failed("Family not found")));
    };
    if !password::verify_password(&req.password, &family.password_hash)? {
        return Ok(Json(AuthResult::failed("Invalid password")));
    }

    // 같은 기기로 같은 가족에 다시 참여하면 기존 보호자를 그대로 씁니다.
    if let Some(existing) = db::get_caregiver_by_device(&state.pool, device_id)
        .await?
        .filter(|c| c.family_id == family.id)
    {
        return Ok(Json(auth_success(&family, &existing)));
    }

    let caregiver = new_caregiver(family.id, caregiver_name, device_id, req.device_name.as_deref());
    db::create_caregiver(&state.pool, &caregiver).await?;

    tracing::info!(family_id = %family.id, caregiver_id = %caregiver.id, "caregiver joined family");
    Ok(Json(auth_success(&family, &caregiver)))
}

/// `GET /families/me` — 보호자 목록을 채운 가족 view
pub async fn get_my_family(
    State(state): State<AppState>,
    auth: AuthCaregiver,
) -> Result<Json<FamilyView>, AppError> {
    let family = db::get_family(&state.pool, auth.family_id).await?;
    let mut view = projection::family_to_view(family.as_ref()).ok_or(AppError::NotFound)?;

    view.caregivers = db::list_caregivers_for_family(&state.pool, auth.family_id)
        .await?
        .iter()
        .filter_map(|c| projection::caregiver_to_view(Some(c)))
        .collect();

    Ok(Json(view))
}

pub async fn update_baby_name(
    State(state): State<AppState>,
    auth: AuthCaregiver,
    Json(req): Json<UpdateBabyNameRequest>,
) -> Result<Json<FamilyView>, AppError> {
    let baby_name = required(&req.baby_name, "babyName")?;
    let family = db::update_baby_name(&state.pool, auth.family_id, baby_name, Utc::now()).await?;
    projection::family_to_view(family.as_ref())
        .map(Json)
        .ok_or(AppError::NotFound)
}

fn new_caregiver(family_id: Uuid, name: &str, device_id: &str, device_name: Option<&str>) -> Caregiver {
    let now = Utc::now();
    Caregiver {
        id: Uuid::now_v7(),
        family_id,
        name: name.to_string(),
        device_id: device_id.to_string(),
        device_name: device_name.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

fn auth_success(family: &Family, caregiver: &Caregiver) -> AuthResult {
    match (
        projection::family_to_view(Some(family)),
        projection::caregiver_to_view(Some(caregiver)),
    ) {
        (Some(family), Some(caregiver)) => AuthResult::ok(family, caregiver),
        _ => AuthResult::failed("Failed to load family"),
    }
}

/// 앞뒤 공백을 뺀 값이 비어 있으면 400
fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed)
}
