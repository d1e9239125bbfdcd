//! # 다음 수유 예측 핸들러
//!
//! - `GET /api/v1/predictions/next-feed`
//!
//! 아직은 고정 간격 예측입니다. 로그인한 보호자만 호출할 수 있습니다.

use crate::{middleware::auth::AuthCaregiver, models::NextFeedPrediction, services::prediction};
use axum::Json;
use chrono::Utc;

pub async fn predict_next_feed(_auth: AuthCaregiver) -> Json<NextFeedPrediction> {
    Json(prediction::predict_next_feed(Utc::now()))
}
