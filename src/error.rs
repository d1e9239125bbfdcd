//! # 에러 처리 모듈
//!
//! 핸들러가 돌려주는 모든 에러를 `AppError` 하나로 모읍니다.
//! `IntoResponse`를 구현해 두었기 때문에 핸들러는 `Result<T, AppError>`만 반환하면 되고,
//! 응답 본문은 항상 같은 모양입니다:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Resource not found" } }
//! ```
//!
//! 내부 에러(DB, 마이그레이션, Internal)는 로그에만 자세히 남기고
//! 클라이언트에는 일반적인 메시지만 보냅니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스 없음 (404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 리소스 충돌 (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// `?`로 sqlx::Error가 자동 변환됩니다 (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// 외부 서비스(음성 인식, 문장 해석) 호출 실패 (502)
    /// 재시도하지 않고 원인 메시지를 그대로 전달합니다.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Upstream(ref msg) => {
                tracing::warn!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Migration(ref e) => {
                tracing::error!("Migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
