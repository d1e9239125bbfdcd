//! # 보호자(Caregiver) 라우트 핸들러
//!
//! - `GET    /api/v1/caregivers/me` → 요청한 보호자 정보
//! - `DELETE /api/v1/caregivers/me` → 가족에서 탈퇴
//!
//! 마지막 보호자가 탈퇴하면 가족도 함께 삭제됩니다.

use crate::{db, error::AppError, middleware::auth::AuthCaregiver, models::*, routes::AppState, services::projection};
use axum::{extract::State, http::StatusCode, Json};

pub async fn get_my_caregiver(
    State(state): State<AppState>,
    auth: AuthCaregiver,
) -> Result<Json<CaregiverView>, AppError> {
    let caregiver = db::get_caregiver(&state.pool, auth.caregiver_id)
        .await?
        .filter(|c| c.family_id == auth.family_id);
    projection::caregiver_to_view(caregiver.as_ref())
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// 성공 시 204 No Content
pub async fn leave_family(
    State(state): State<AppState>,
    auth: AuthCaregiver,
) -> Result<StatusCode, AppError> {
    let caregiver = db::get_caregiver(&state.pool, auth.caregiver_id)
        .await?
        .filter(|c| c.family_id == auth.family_id)
        .ok_or(AppError::NotFound)?;

    db::delete_caregiver(&state.pool, caregiver.id).await?;
    tracing::info!(caregiver_id = %caregiver.id, family_id = %caregiver.family_id, "caregiver left family");

    if db::list_caregivers_for_family(&state.pool, caregiver.family_id)
        .await?
        .is_empty()
    {
        db::delete_family(&state.pool, caregiver.family_id).await?;
        tracing::info!(family_id = %caregiver.family_id, "last caregiver left, family deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
